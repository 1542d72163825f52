// libs/doctor-cell/src/services/filters.rs
//
// Listing pipeline. Every stage takes ownership of the working list and
// returns the narrowed (or reordered) list; callers keep their own copy.

use std::collections::BTreeSet;

use crate::models::{ConsultationMode, Doctor, FilterState, PriceRange, SortOption};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Case-insensitive match on name, any specialty, or location.
fn matches_term(doctor: &Doctor, term: &str) -> bool {
    doctor.name.to_lowercase().contains(term)
        || doctor.specialties.iter().any(|s| s.to_lowercase().contains(term))
        || doctor.location.as_deref().is_some_and(|l| l.to_lowercase().contains(term))
}

pub fn filter_by_search(mut doctors: Vec<Doctor>, search: &str) -> Vec<Doctor> {
    let term = search.trim().to_lowercase();
    if term.is_empty() {
        return doctors;
    }

    doctors.retain(|doctor| matches_term(doctor, &term));
    doctors
}

pub fn filter_by_consultation_type(
    mut doctors: Vec<Doctor>,
    mode: Option<ConsultationMode>,
) -> Vec<Doctor> {
    if let Some(mode) = mode {
        doctors.retain(|doctor| doctor.offers(mode));
    }
    doctors
}

pub fn filter_by_specialties(mut doctors: Vec<Doctor>, selected: &[String]) -> Vec<Doctor> {
    if selected.is_empty() {
        return doctors;
    }

    doctors.retain(|doctor| doctor.specialties.iter().any(|s| selected.contains(s)));
    doctors
}

pub fn filter_by_price_range(mut doctors: Vec<Doctor>, range: PriceRange) -> Vec<Doctor> {
    doctors.retain(|doctor| range.contains(doctor.fees));
    doctors
}

pub fn filter_by_availability(mut doctors: Vec<Doctor>, available_only: bool) -> Vec<Doctor> {
    if available_only {
        doctors.retain(|doctor| doctor.available);
    }
    doctors
}

/// Stable: doctors with equal keys keep their relative order.
pub fn sort_doctors(mut doctors: Vec<Doctor>, sort: Option<SortOption>) -> Vec<Doctor> {
    match sort {
        Some(SortOption::Fees) => doctors.sort_by(|a, b| a.fees.total_cmp(&b.fees)),
        Some(SortOption::FeesDesc) => doctors.sort_by(|a, b| b.fees.total_cmp(&a.fees)),
        Some(SortOption::Experience) => doctors.sort_by(|a, b| b.experience.cmp(&a.experience)),
        Some(SortOption::Availability) => doctors.sort_by(|a, b| b.available.cmp(&a.available)),
        None => {}
    }
    doctors
}

/// Search, consultation mode, specialties, price, availability, then sort.
pub fn apply_filters(doctors: &[Doctor], filters: &FilterState) -> Vec<Doctor> {
    let filtered = filter_by_search(doctors.to_vec(), &filters.search);
    let filtered = filter_by_consultation_type(filtered, filters.consultation_type);
    let filtered = filter_by_specialties(filtered, &filters.specialties);
    let filtered = filter_by_price_range(filtered, filters.price_range);
    let filtered = filter_by_availability(filtered, filters.available_only);
    sort_doctors(filtered, filters.sort)
}

/// Every specialty in the list, deduplicated and sorted alphabetically.
pub fn extract_specialties(doctors: &[Doctor]) -> Vec<String> {
    doctors.iter()
        .flat_map(|doctor| doctor.specialties.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Autocomplete: first `limit` doctors matching the input, in list order.
pub fn suggest(doctors: &[Doctor], input: &str, limit: usize) -> Vec<Doctor> {
    let term = input.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    doctors.iter()
        .filter(|doctor| matches_term(doctor, &term))
        .take(limit)
        .cloned()
        .collect()
}

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PRICE_MIN: f64 = 0.0;
pub const DEFAULT_PRICE_MAX: f64 = 5000.0;
pub const DEFAULT_REVIEW_RATING: f64 = 4.5;

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

// ==============================================================================
// DIRECTORY RECORDS
// ==============================================================================

/// A doctor as served by the directory, normalized from a [`DoctorRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
    pub experience: u32,
    pub fees: f64,
    pub video_consult: bool,
    pub in_clinic: bool,
    pub available: bool,
    pub qualification: Option<String>,
    pub location: Option<String>,
    pub clinic_name: Option<String>,
    pub about: Option<String>,
    pub image: Option<String>,
    pub languages: Vec<String>,
    pub services: Vec<String>,
    pub rating: Option<f64>,
    pub reviews: Vec<Review>,
}

impl Doctor {
    pub fn offers(&self, mode: ConsultationMode) -> bool {
        match mode {
            ConsultationMode::VideoConsult => self.video_consult,
            ConsultationMode::InClinic => self.in_clinic,
        }
    }

    /// Name without a leading "Dr." so it can be prefixed in prose.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        name.strip_prefix("Dr.")
            .or_else(|| name.strip_prefix("Dr "))
            .map(str::trim_start)
            .unwrap_or(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub patient_name: Option<String>,
    pub rating: f64,
    pub comment: Option<String>,
    pub date: Option<String>,
    pub treatment_type: Option<String>,
}

/// Raw record shape returned by the doctors endpoint.
///
/// The public feed is loosely typed: fees arrive as `"₹ 500"`, experience as
/// `"13 Years of experience"`, specialties either as plain strings or as
/// `{ "name": ... }` objects, flags as `true` or `"true"`. Everything that is
/// not a plain string is kept as a [`Value`] and resolved in
/// [`DoctorRecord::into_doctor`], so a badly typed field degrades to its
/// default instead of rejecting the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "specialty")]
    pub speciality: Option<Value>,
    #[serde(default)]
    pub specialities: Option<Value>,
    #[serde(default)]
    pub experience: Option<Value>,
    #[serde(default)]
    pub fees: Option<Value>,
    #[serde(default, alias = "video_consult")]
    pub video_consult: Option<Value>,
    #[serde(default, alias = "in_clinic")]
    pub in_clinic: Option<Value>,
    #[serde(default)]
    pub availability: Option<Value>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub clinic: Option<Value>,
    #[serde(default, alias = "doctor_introduction")]
    pub about: Option<String>,
    #[serde(default, alias = "photo")]
    pub image: Option<String>,
    #[serde(default)]
    pub languages: Option<Value>,
    #[serde(default)]
    pub services: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub reviews: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<ClinicAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicAddress {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    #[serde(default, alias = "patient_name")]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "treatment_type")]
    pub treatment_type: Option<String>,
}

impl DoctorRecord {
    /// Normalize a raw record. `position` is the zero-based index of the
    /// record in the response and only feeds the synthetic `doc-N` id.
    pub fn into_doctor(self, position: usize) -> Doctor {
        let id = self.id.as_ref()
            .and_then(value_to_string)
            .unwrap_or_else(|| format!("doc-{}", position + 1));

        let mut specialties = self.speciality.as_ref().map(string_list).unwrap_or_default();
        for specialty in self.specialities.as_ref().map(string_list).unwrap_or_default() {
            if !specialties.contains(&specialty) {
                specialties.push(specialty);
            }
        }

        let experience = self.experience.as_ref()
            .and_then(parse_number)
            .map(|years| years.max(0.0) as u32)
            .unwrap_or(0);

        let fees = self.fees.as_ref().and_then(parse_number).unwrap_or(0.0);

        let video_consult = self.video_consult.as_ref().and_then(parse_flag).unwrap_or(false);
        let in_clinic = self.in_clinic.as_ref().and_then(parse_flag).unwrap_or(false);
        let available = self.availability.as_ref()
            .and_then(parse_flag)
            .unwrap_or(video_consult || in_clinic);

        let clinic = self.clinic
            .and_then(|value| serde_json::from_value::<ClinicRecord>(value).ok());
        let (clinic_name, clinic_location) = match clinic {
            Some(clinic) => {
                let location = clinic.address.map(|address| {
                    [address.locality, address.city]
                        .into_iter()
                        .flatten()
                        .map(|part| part.trim().to_string())
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                        .join(", ")
                });
                (non_blank(clinic.name), non_blank(location))
            }
            None => (None, None),
        };

        let reviews = match self.reviews {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let reviews = reviews.into_iter()
            .filter_map(|item| serde_json::from_value::<ReviewRecord>(item).ok())
            .map(|review| Review {
                patient_name: non_blank(review.patient_name),
                rating: review.rating.as_ref().and_then(parse_number).unwrap_or(0.0),
                comment: non_blank(review.comment),
                date: non_blank(review.date),
                treatment_type: non_blank(review.treatment_type),
            })
            .collect();

        Doctor {
            id,
            name: self.name.map(|name| name.trim().to_string()).unwrap_or_default(),
            specialties,
            experience,
            fees,
            video_consult,
            in_clinic,
            available,
            qualification: non_blank(self.qualification),
            location: non_blank(self.location).or(clinic_location),
            clinic_name: non_blank(self.clinic_name).or(clinic_name),
            about: non_blank(self.about),
            image: non_blank(self.image),
            languages: self.languages.as_ref().map(string_list).unwrap_or_default(),
            services: self.services.as_ref().map(string_list).unwrap_or_default(),
            rating: self.rating.as_ref().and_then(parse_number),
            reviews,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First number found in a JSON number or a decorated string ("₹ 1,200").
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s.replace(',', "");
            NUMBER_PATTERN.find(&cleaned)
                .and_then(|m| m.as_str().parse::<f64>().ok())
        }
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    let entry = |item: &Value| -> Option<String> {
        match item {
            Value::String(s) => non_blank(Some(s.clone())),
            Value::Object(map) => map.get("name").and_then(value_to_string),
            _ => None,
        }
    };

    match value {
        Value::Array(items) => items.iter().filter_map(entry).collect(),
        other => entry(other).into_iter().collect(),
    }
}

/// Boolean from `true`, `1`, or strings such as `"true"`/`"available"`.
fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "available" | "true" | "yes" | "1"
        )),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}

// ==============================================================================
// FILTERS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsultationMode {
    #[serde(rename = "videoConsult")]
    VideoConsult,
    #[serde(rename = "inClinic")]
    InClinic,
}

impl ConsultationMode {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "videoConsult" => Some(Self::VideoConsult),
            "inClinic" => Some(Self::InClinic),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            Self::VideoConsult => "videoConsult",
            Self::InClinic => "inClinic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VideoConsult => "Video Consult",
            Self::InClinic => "In Clinic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOption {
    /// Fee, low to high
    #[default]
    #[serde(rename = "fees")]
    Fees,
    /// Fee, high to low
    #[serde(rename = "fees-desc")]
    FeesDesc,
    /// Most experienced first
    #[serde(rename = "experience")]
    Experience,
    /// Available doctors first
    #[serde(rename = "availability")]
    Availability,
}

impl SortOption {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "fees" => Some(Self::Fees),
            "fees-desc" => Some(Self::FeesDesc),
            "experience" => Some(Self::Experience),
            "availability" => Some(Self::Availability),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Fees => "fees",
            Self::FeesDesc => "fees-desc",
            Self::Experience => "experience",
            Self::Availability => "availability",
        }
    }
}

/// Inclusive fee bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, fee: f64) -> bool {
        fee >= self.min && fee <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_MIN, DEFAULT_PRICE_MAX)
    }
}

/// Everything a listing request can narrow or order by. Mirrors the query
/// string one to one, see `services::query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub consultation_type: Option<ConsultationMode>,
    pub specialties: Vec<String>,
    pub price_range: PriceRange,
    pub available_only: bool,
    /// `None` keeps the fetched order.
    pub sort: Option<SortOption>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            consultation_type: None,
            specialties: Vec::new(),
            price_range: PriceRange::default(),
            available_only: false,
            sort: Some(SortOption::default()),
        }
    }
}

// ==============================================================================
// DETAIL VIEW
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub stars: u8,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub average_rating: f64,
    pub total: usize,
    pub breakdown: Vec<RatingBucket>,
}

impl ReviewSummary {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        let total = doctor.reviews.len();
        let breakdown = (1..=5u8)
            .rev()
            .map(|stars| {
                let count = doctor.reviews.iter()
                    .filter(|review| review.rating.round() == f64::from(stars))
                    .count();
                let percentage = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                RatingBucket { stars, count, percentage }
            })
            .collect();

        Self {
            average_rating: doctor.rating
                .filter(|rating| *rating > 0.0)
                .unwrap_or(DEFAULT_REVIEW_RATING),
            total,
            breakdown,
        }
    }
}

/// Doctor record plus the display fallbacks used by the profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorDetail {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub about_text: String,
    pub clinic_display_name: String,
    pub address: String,
    pub offered_services: Vec<String>,
    pub review_summary: ReviewSummary,
}

impl From<Doctor> for DoctorDetail {
    fn from(doctor: Doctor) -> Self {
        let display_name = doctor.display_name().to_string();

        let about_text = doctor.about.clone().unwrap_or_else(|| {
            let fields = if doctor.specialties.is_empty() {
                "various medical fields".to_string()
            } else {
                doctor.specialties.join(", ")
            };
            let qualification = doctor.qualification.as_deref()
                .unwrap_or("their medical qualifications");
            format!(
                "Dr. {} is a healthcare professional with {} years of experience specializing in {}. \
                 They have earned {} and are committed to providing quality healthcare.",
                display_name, doctor.experience, fields, qualification
            )
        });

        let clinic_display_name = doctor.clinic_name.clone()
            .unwrap_or_else(|| format!("Dr. {}'s Clinic", display_name));
        let address = doctor.location.clone()
            .unwrap_or_else(|| "Address information not available".to_string());
        let offered_services = if doctor.services.is_empty() {
            vec!["General Consultation".to_string()]
        } else {
            doctor.services.clone()
        };
        let review_summary = ReviewSummary::from_doctor(&doctor);

        Self {
            doctor,
            about_text,
            clinic_display_name,
            address,
            offered_services,
            review_summary,
        }
    }
}

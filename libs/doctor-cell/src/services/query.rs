// libs/doctor-cell/src/services/query.rs
//
// FilterState <-> URL query string. Parameter names match the listing page
// URLs: search, consultationType, sort, specialties, priceMin, priceMax,
// availability.

use url::form_urlencoded;

use crate::models::{
    ConsultationMode, FilterState, PriceRange, SortOption, DEFAULT_PRICE_MAX, DEFAULT_PRICE_MIN,
};

pub const PARAM_SEARCH: &str = "search";
pub const PARAM_CONSULTATION_TYPE: &str = "consultationType";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_SPECIALTIES: &str = "specialties";
pub const PARAM_PRICE_MIN: &str = "priceMin";
pub const PARAM_PRICE_MAX: &str = "priceMax";
pub const PARAM_AVAILABILITY: &str = "availability";

fn parse_price(raw: Option<&str>, fallback: f64) -> f64 {
    // Zero and garbage both fall back, same as an empty input box.
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value != 0.0)
        .unwrap_or(fallback)
}

fn format_price(value: f64) -> String {
    format!("{}", value)
}

impl FilterState {
    /// Build filters from decoded query pairs. Missing or malformed values
    /// take their defaults; when a key repeats, the first occurrence wins.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut search = None;
        let mut consultation_type = None;
        let mut sort = None;
        let mut specialties = None;
        let mut price_min = None;
        let mut price_max = None;
        let mut availability = None;

        for (key, value) in pairs {
            let slot = match key {
                PARAM_SEARCH => &mut search,
                PARAM_CONSULTATION_TYPE => &mut consultation_type,
                PARAM_SORT => &mut sort,
                PARAM_SPECIALTIES => &mut specialties,
                PARAM_PRICE_MIN => &mut price_min,
                PARAM_PRICE_MAX => &mut price_max,
                PARAM_AVAILABILITY => &mut availability,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        let sort = match sort.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => SortOption::from_param(value),
            None => Some(SortOption::default()),
        };

        let specialties = specialties
            .map(|value| {
                value.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let available_only = availability
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "available" | "yes"))
            .unwrap_or(false);

        Self {
            search: search.unwrap_or_default().to_string(),
            consultation_type: consultation_type.and_then(ConsultationMode::from_param),
            specialties,
            price_range: PriceRange::new(
                parse_price(price_min, DEFAULT_PRICE_MIN),
                parse_price(price_max, DEFAULT_PRICE_MAX),
            ),
            available_only,
            sort,
        }
    }

    /// Parse a raw, still percent-encoded query string (no leading `?`).
    pub fn from_query_string(query: &str) -> Self {
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();

        Self::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Query pairs for the current state. Defaults are left out so the URL
    /// stays short; the sort key is kept whenever one is set. A price bound
    /// is written whenever it differs from its default, including bounds
    /// outside `0..=5000`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if self.search_term().is_some() {
            params.push((PARAM_SEARCH, self.search.clone()));
        }
        if let Some(mode) = self.consultation_type {
            params.push((PARAM_CONSULTATION_TYPE, mode.as_param().to_string()));
        }
        if let Some(sort) = self.sort {
            params.push((PARAM_SORT, sort.as_param().to_string()));
        }
        if !self.specialties.is_empty() {
            params.push((PARAM_SPECIALTIES, self.specialties.join(",")));
        }
        if self.price_range.min != DEFAULT_PRICE_MIN {
            params.push((PARAM_PRICE_MIN, format_price(self.price_range.min)));
        }
        if self.price_range.max != DEFAULT_PRICE_MAX {
            params.push((PARAM_PRICE_MAX, format_price(self.price_range.max)));
        }
        if self.available_only {
            params.push((PARAM_AVAILABILITY, "true".to_string()));
        }

        params
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_query_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    // ==========================================================================
    // Control updates
    // ==========================================================================

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = Some(sort);
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.price_range = range;
    }

    pub fn set_available_only(&mut self, available_only: bool) {
        self.available_only = available_only;
    }

    /// Checkbox semantics: add when absent, remove when present.
    pub fn toggle_specialty(&mut self, specialty: &str) {
        match self.specialties.iter().position(|s| s == specialty) {
            Some(index) => {
                self.specialties.remove(index);
            }
            None => self.specialties.push(specialty.to_string()),
        }
    }

    /// Selecting the active mode again clears it.
    pub fn toggle_consultation_mode(&mut self, mode: ConsultationMode) {
        self.consultation_type = if self.consultation_type == Some(mode) {
            None
        } else {
            Some(mode)
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        Some(self.search.trim()).filter(|term| !term.is_empty())
    }

    /// Whether any narrowing control is set. Sort, price and availability
    /// do not count.
    pub fn has_active_filters(&self) -> bool {
        self.search_term().is_some() || !self.specialties.is_empty() || self.consultation_type.is_some()
    }

    pub fn active_filter_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();

        if !self.specialties.is_empty() {
            labels.push(format!("{} Specialties", self.specialties.len()));
        }
        if let Some(mode) = self.consultation_type {
            labels.push(mode.label().to_string());
        }
        if let Some(term) = self.search_term() {
            labels.push(format!("Search: \"{}\"", term));
        }

        labels
    }
}

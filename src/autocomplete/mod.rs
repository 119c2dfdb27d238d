//! City-name suggestions for the city inputs of both flows.

/// Cities offered by the autocomplete, in display order.
pub const CITIES: &[&str] = &[
    "אילת",
    "אשדוד",
    "אשקלון",
    "באר שבע",
    "בת ים",
    "גבעתיים",
    "הרצליה",
    "חדרה",
    "חולון",
    "חיפה",
    "טבריה",
    "יבנה",
    "יהוד",
    "ירושלים",
    "כפר סבא",
    "כרמיאל",
    "מודיעין",
    "נס ציונה",
    "נהריה",
    "נתניה",
    "עפולה",
    "פתח תקווה",
    "צפת",
    "קריית אונו",
    "קריית גת",
    "קריית שמונה",
    "ראש העין",
    "ראשון לציון",
    "רחובות",
    "רמלה",
    "רמת גן",
    "רעננה",
    "תל אביב",
];

#[derive(Debug, Clone, Copy)]
pub struct CityAutocomplete {
    cities: &'static [&'static str],
}

impl Default for CityAutocomplete {
    fn default() -> Self {
        Self::new(CITIES)
    }
}

impl CityAutocomplete {
    pub const fn new(cities: &'static [&'static str]) -> Self {
        Self { cities }
    }

    /// Cities containing `input`, compared as-is and then case-insensitively.
    ///
    /// Blank input yields nothing.
    pub fn suggest(&self, input: &str) -> Vec<&'static str> {
        let needle = input.trim();
        if needle.is_empty() {
            return Vec::new();
        }
        let lowered = needle.to_lowercase();
        self.cities
            .iter()
            .copied()
            .filter(|city| city.contains(needle) || city.to_lowercase().contains(&lowered))
            .collect()
    }

    /// Exact match against the list, used when a suggestion is picked.
    pub fn is_known(&self, city: &str) -> bool {
        let city = city.trim();
        self.cities.iter().any(|known| *known == city)
    }
}

pub fn suggest(input: &str) -> Vec<&'static str> {
    CityAutocomplete::default().suggest(input)
}

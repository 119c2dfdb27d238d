/// A primary treatment category and its dependent sub-specialties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specialization {
    pub key: &'static str,
    pub label: &'static str,
    pub subs: &'static [&'static str],
}

const STANDARD: &[Specialization] = &[
    Specialization {
        key: "speech",
        label: "קלינאות תקשורת",
        subs: &[
            "עיכוב שפתי",
            "גמגום",
            "קשיי היגוי",
            "עיבוד שמיעתי",
            "תקשורת חברתית",
            "הזנה ואכילה",
            "תקשורת תומכת וחליפית (AAC)",
        ],
    },
    Specialization {
        key: "ot",
        label: "ריפוי בעיסוק",
        subs: &[
            "ויסות חושי",
            "מוטוריקה עדינה",
            "מוטוריקה גסה",
            "גרפומוטוריקה",
            "תפקודי יום-יום (ADL)",
            "עבודה עם ASD",
            "מיומנויות כיתה א׳",
        ],
    },
    Specialization {
        key: "physio",
        label: "פיזיותרפיה",
        subs: &[
            "פיזיותרפיה תינוקות",
            "פיזיותרפיה נשימתית",
            "פציעות ספורט ילדים",
            "שיקום לאחר פגיעה",
            "טיפול ביציבה",
        ],
    },
    Specialization {
        key: "emotional",
        label: "טיפול רגשי",
        subs: &[
            "טיפול במשחק",
            "טיפול באמצעות אמנות",
            "ויסות רגשי",
            "חרדות ילדים",
            "טיפול דיאדי הורה-ילד",
        ],
    },
    Specialization {
        key: "psychology",
        label: "פסיכולוגיה",
        subs: &[
            "פסיכולוגיה התפתחותית",
            "פסיכולוגיה חינוכית",
            "CBT לילדים",
            "טיפול משפחתי",
            "טיפול בנוער עם חרדה",
        ],
    },
];

/// Read-only mapping from primary category to sub-specialties.
#[derive(Debug, Clone, Copy)]
pub struct SpecializationCatalog {
    entries: &'static [Specialization],
}

impl Default for SpecializationCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl SpecializationCatalog {
    pub const fn new(entries: &'static [Specialization]) -> Self {
        Self { entries }
    }

    pub const fn standard() -> Self {
        Self::new(STANDARD)
    }

    pub fn entries(&self) -> &'static [Specialization] {
        self.entries
    }

    /// Finds a category by key or by its display label.
    pub fn find(&self, key_or_label: &str) -> Option<&'static Specialization> {
        let needle = key_or_label.trim();
        self.entries
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(needle) || entry.label == needle)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.label.to_string())
            .collect()
    }
}

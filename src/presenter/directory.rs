/// Contact number shown when a therapist is not in the directory.
pub const DEFAULT_PHONE: &str = "03-1234567";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TherapistProfile {
    pub name: &'static str,
    pub phone: &'static str,
    pub education: &'static str,
    pub experience: &'static str,
    pub languages: &'static [&'static str],
    pub about: &'static str,
}

const STANDARD: &[TherapistProfile] = &[
    TherapistProfile {
        name: "ד\"ר מיכל לוי",
        phone: "050-1234567",
        education: "דוקטורט בהפרעות תקשורת, אוניברסיטת תל אביב",
        experience: "12 שנות ניסיון עם ילדים בגיל הרך",
        languages: &["עברית", "אנגלית"],
        about: "מתמחה בעיכוב שפתי ובגמגום, עבודה משולבת עם ההורים",
    },
    TherapistProfile {
        name: "יעל כהן",
        phone: "052-7654321",
        education: "תואר שני בריפוי בעיסוק, האוניברסיטה העברית",
        experience: "8 שנות ניסיון בגני ילדים ובקליניקה פרטית",
        languages: &["עברית", "רוסית"],
        about: "ויסות חושי וגרפומוטוריקה, טיפול בסביבה טבעית",
    },
    TherapistProfile {
        name: "אורי שמעוני",
        phone: "054-9876543",
        education: "תואר שני בפסיכולוגיה חינוכית, אוניברסיטת חיפה",
        experience: "10 שנות ניסיון בשירות הפסיכולוגי החינוכי",
        languages: &["עברית", "ערבית", "אנגלית"],
        about: "אבחונים ורגשי, ליווי הורים במעברים",
    },
];

/// Static therapist lookup by display name.
#[derive(Debug, Clone, Copy)]
pub struct TherapistDirectory {
    profiles: &'static [TherapistProfile],
}

impl Default for TherapistDirectory {
    fn default() -> Self {
        Self::standard()
    }
}

impl TherapistDirectory {
    pub const fn new(profiles: &'static [TherapistProfile]) -> Self {
        Self { profiles }
    }

    pub const fn standard() -> Self {
        Self::new(STANDARD)
    }

    pub fn find(&self, name: &str) -> Option<&'static TherapistProfile> {
        let name = name.trim();
        self.profiles.iter().find(|profile| profile.name == name)
    }

    /// Phone number for `name`, or [`DEFAULT_PHONE`] for unknown names.
    pub fn phone_for(&self, name: &str) -> &'static str {
        self.find(name)
            .map(|profile| profile.phone)
            .unwrap_or(DEFAULT_PHONE)
    }

    pub fn profiles(&self) -> &'static [TherapistProfile] {
        self.profiles
    }
}

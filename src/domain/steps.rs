use super::FlowKind;

/// One step panel of a flow and the fields that must be filled to leave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub number: u8,
    pub title: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl StepDefinition {
    /// Every field rendered on the panel, required ones first.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> {
        self.required.iter().chain(self.optional.iter()).copied()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields().any(|field| field == name)
    }
}

/// A multi-select chip control whose active labels are joined into a hidden field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipGroup {
    pub name: &'static str,
    pub options: &'static [&'static str],
}

/// Chip group whose options come from the specialization catalog.
pub const THERAPIST_MAIN_FIELDS: &str = "therapist_main_fields";
/// Chip group re-rendered from the selected main fields.
pub const THERAPIST_SUB_FIELDS: &str = "therapist_sub_fields";
/// Parent select driving the sub-specialty select.
pub const PARENT_MAIN_TREATMENT: &str = "main_treatment";
pub const PARENT_SUB_SPECIALTY: &str = "sub_specialty";
pub const CITY_FIELDS: &[&str] = &["city", "therapist_city"];

const PARENT_STEPS: &[StepDefinition] = &[
    StepDefinition {
        number: 1,
        title: "פרטי הילד",
        required: &["child_name", "child_age", "city"],
        optional: &["child_school"],
    },
    StepDefinition {
        number: 2,
        title: "תחום הטיפול",
        required: &[PARENT_MAIN_TREATMENT],
        optional: &[PARENT_SUB_SPECIALTY, "concern_description"],
    },
    StepDefinition {
        number: 3,
        title: "העדפות",
        required: &["meeting_type"],
        optional: &["parent_preferences"],
    },
    StepDefinition {
        number: 4,
        title: "פרטי קשר ומסמכים",
        required: &["parent_name", "parent_phone", "parent_email"],
        optional: &["parent_notes"],
    },
];

const THERAPIST_STEPS: &[StepDefinition] = &[
    StepDefinition {
        number: 1,
        title: "פרטים אישיים",
        required: &["full_name", "therapist_phone", "therapist_email"],
        optional: &[],
    },
    StepDefinition {
        number: 2,
        title: "תחומי התמחות",
        required: &[THERAPIST_MAIN_FIELDS, "license_number"],
        optional: &[THERAPIST_SUB_FIELDS, "experience_years"],
    },
    StepDefinition {
        number: 3,
        title: "זמינות ואופן מפגש",
        required: &["therapist_meeting_types", "therapist_city"],
        optional: &["therapist_availability"],
    },
    StepDefinition {
        number: 4,
        title: "לידים ומסמכים",
        required: &["therapist_lead_types"],
        optional: &["therapist_bio"],
    },
];

const PARENT_CHIPS: &[ChipGroup] = &[ChipGroup {
    name: "parent_preferences",
    options: &[
        "מטפל/ת דובר/ת ערבית",
        "מטפל/ת דובר/ת רוסית",
        "מפגשים בבית",
        "שעות ערב",
        "ניסיון עם ASD",
        "עבודה מול הגן / בית הספר",
    ],
}];

const THERAPIST_CHIPS: &[ChipGroup] = &[
    ChipGroup {
        name: "therapist_meeting_types",
        options: &["קליניקה", "ביקור בית", "אונליין", "בגן / בבית הספר"],
    },
    ChipGroup {
        name: "therapist_availability",
        options: &["בוקר", "צהריים", "ערב", "שישי"],
    },
    ChipGroup {
        name: "therapist_lead_types",
        options: &["פרטי", "קופת חולים", "ביטוח משלים", "משרד החינוך"],
    },
];

/// Static step layout of one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowDefinition {
    pub kind: FlowKind,
    pub steps: &'static [StepDefinition],
    pub chips: &'static [ChipGroup],
}

impl FlowDefinition {
    pub fn for_kind(kind: FlowKind) -> Self {
        match kind {
            FlowKind::Parent => Self {
                kind,
                steps: PARENT_STEPS,
                chips: PARENT_CHIPS,
            },
            FlowKind::Therapist => Self {
                kind,
                steps: THERAPIST_STEPS,
                chips: THERAPIST_CHIPS,
            },
        }
    }

    pub fn total_steps(&self) -> u8 {
        self.steps.len() as u8
    }

    pub fn step(&self, number: u8) -> Option<&'static StepDefinition> {
        self.steps.iter().find(|step| step.number == number)
    }

    pub fn required_fields(&self, number: u8) -> &'static [&'static str] {
        self.step(number).map(|step| step.required).unwrap_or(&[])
    }

    /// Step panel hosting `field`, if any.
    pub fn step_of(&self, field: &str) -> Option<u8> {
        self.steps
            .iter()
            .find(|step| step.has_field(field))
            .map(|step| step.number)
    }

    /// Static chip group by name. Catalog-driven groups are resolved by the session.
    pub fn chip_group(&self, name: &str) -> Option<&'static ChipGroup> {
        self.chips.iter().find(|group| group.name == name)
    }
}

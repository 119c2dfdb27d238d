use thiserror::Error;

use crate::domain::FlowKind;

/// Failures raised by key-value storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
}

/// Rejections produced by the wizard step machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("step {step} is outside 1..={total}")]
    StepOutOfRange { step: u8, total: u8 },
    #[error("step {target} is ahead of the current step {current}")]
    NotBackward { current: u8, target: u8 },
    #[error("step {step} has empty required fields: {}", fields.join(", "))]
    MissingFields { step: u8, fields: Vec<String> },
    #[error("the {flow} flow can only be submitted from its last step")]
    NotOnLastStep { flow: FlowKind },
}

/// Rejections produced by the category slot resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("category `{category}` is already selected in slot {slot}")]
    AlreadySelected { category: String, slot: usize },
    #[error("slot {slot} is outside 0..{max}")]
    SlotOutOfRange { slot: usize, max: usize },
    #[error("at most {max} categories can be selected")]
    LimitReached { max: usize },
}

/// Failures raised by the booking calendar and scheduling backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("unknown therapist `{0}`")]
    UnknownTherapist(String),
    #[error("no booking calendar is open")]
    NoCalendar,
    #[error("no slot {day} {time} in the calendar")]
    UnknownSlot { day: String, time: String },
    #[error("slot {day} {time} is not available")]
    SlotUnavailable { day: String, time: String },
    #[error("no slot has been selected")]
    NothingSelected,
}

/// Failures raised by the insurance module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsuranceError {
    #[error("consent to policy analysis is required")]
    ConsentMissing,
    #[error("a policy file must be uploaded first")]
    PolicyMissing,
    #[error("an analysis is already running")]
    AnalysisPending,
    #[error("field `{0}` is required")]
    MissingField(String),
}

/// Failures raised when accepting uploaded files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("file `{name}` exceeds the {limit} byte limit")]
    TooLarge { name: String, limit: u64 },
    #[error("no uploaded file named `{0}`")]
    NotFound(String),
}

/// Any rejection a session handler can report back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Option(#[from] OptionError),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Insurance(#[from] InsuranceError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("field `{field}` is not part of the {flow} flow")]
    UnknownField { flow: FlowKind, field: String },
    #[error("`{0}` is a chip group; toggle its options instead")]
    ChipField(String),
    #[error("unknown chip group `{0}`")]
    UnknownChipGroup(String),
    #[error("`{value}` is not an option of `{field}`")]
    NotOffered { field: String, value: String },
    #[error("no result card `{0}`")]
    UnknownMatch(String),
    #[error("no demo screen `{0}`")]
    UnknownDemoScreen(String),
}

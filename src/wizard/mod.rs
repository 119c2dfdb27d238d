//! The multi-step form wizard shared by the parent and therapist flows.

pub mod machine;
pub mod options;
pub mod surface;
pub mod validator;

pub use machine::{FlowOutcome, StepChange, WizardContext, WizardMachine};
pub use options::{resolve_subspecialties, CategorySlots, MAX_CATEGORY_SLOTS};
pub use surface::{FormSurface, MemorySurface, Progress};
pub use validator::{empty_fields, missing_required};

//! Session state that survives restarts, plus the static step, chip and
//! specialization tables the wizard is driven by.

pub mod catalog;
pub mod files;
pub mod steps;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use catalog::{Specialization, SpecializationCatalog};
pub use files::{format_file_size, guess_mime, FileDescriptor, FileKind, MAX_UPLOAD_BYTES};
pub use steps::{ChipGroup, FlowDefinition, StepDefinition};

/// The two guided flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Parent,
    Therapist,
}

impl FlowKind {
    pub const ALL: [FlowKind; 2] = [FlowKind::Parent, FlowKind::Therapist];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Parent => "parent",
            FlowKind::Therapist => "therapist",
        }
    }

    /// View hosting this flow's form.
    pub fn view(&self) -> View {
        match self {
            FlowKind::Parent => View::ParentFlow,
            FlowKind::Therapist => View::TherapistFlow,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "parent" | "parents" => Ok(FlowKind::Parent),
            "therapist" | "therapists" => Ok(FlowKind::Therapist),
            other => Err(format!("unknown flow `{}` (use parent or therapist)", other)),
        }
    }
}

/// Top-level screens of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum View {
    #[default]
    #[serde(rename = "landing")]
    Landing,
    #[serde(rename = "parent-flow")]
    ParentFlow,
    #[serde(rename = "therapist-flow")]
    TherapistFlow,
    #[serde(rename = "insurance")]
    Insurance,
    #[serde(rename = "demo-center")]
    DemoCenter,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Landing,
        View::ParentFlow,
        View::TherapistFlow,
        View::Insurance,
        View::DemoCenter,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            View::Landing => "landing",
            View::ParentFlow => "parent-flow",
            View::TherapistFlow => "therapist-flow",
            View::Insurance => "insurance",
            View::DemoCenter => "demo-center",
        }
    }

    /// Localized name announced when the view is opened.
    pub fn display_name(&self) -> &'static str {
        match self {
            View::Landing => "דף הבית",
            View::ParentFlow => "זרימת הורים",
            View::TherapistFlow => "זרימת מטפלים",
            View::Insurance => "מודול ביטוח",
            View::DemoCenter => "מסכי דמו",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let view = match normalized.as_str() {
            "landing" | "home" => View::Landing,
            "parent-flow" | "parent" => View::ParentFlow,
            "therapist-flow" | "therapist" => View::TherapistFlow,
            "insurance" => View::Insurance,
            "demo-center" | "demo" => View::DemoCenter,
            other => return Err(format!("unknown view `{}`", other)),
        };
        Ok(view)
    }
}

/// Progress of one flow: current step, entered values, chip selections and uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowState {
    pub current_step: u8,
    pub field_values: BTreeMap<String, String>,
    /// Active chip labels keyed by chip group, in rendered order.
    pub selected_tags: BTreeMap<String, Vec<String>>,
    pub uploaded_file_descriptors: Vec<FileDescriptor>,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            current_step: 1,
            field_values: BTreeMap::new(),
            selected_tags: BTreeMap::new(),
            uploaded_file_descriptors: Vec::new(),
        }
    }
}

impl FlowState {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.field_values.get(name).map(String::as_str)
    }

    pub fn tags(&self, group: &str) -> &[String] {
        self.selected_tags
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Flips `label` in `group` and rewrites the group's hidden field value.
    ///
    /// `rendered` is the group's option order; active labels are kept in that
    /// order. Returns whether the label is active afterwards.
    pub fn toggle_tag(&mut self, group: &str, label: &str, rendered: &[String]) -> bool {
        let current = self.selected_tags.remove(group).unwrap_or_default();
        let now_active = !current.iter().any(|tag| tag == label);
        let active: Vec<String> = rendered
            .iter()
            .filter(|option| {
                if option.as_str() == label {
                    now_active
                } else {
                    current.contains(*option)
                }
            })
            .cloned()
            .collect();
        self.set_tags(group, active);
        now_active
    }

    /// Drops labels of `group` that are no longer rendered. Returns the pruned labels.
    pub fn retain_tags(&mut self, group: &str, rendered: &[String]) -> Vec<String> {
        let current = self.selected_tags.remove(group).unwrap_or_default();
        let (kept, pruned): (Vec<String>, Vec<String>) = current
            .into_iter()
            .partition(|tag| rendered.contains(tag));
        self.set_tags(group, kept);
        pruned
    }

    /// Replaces the active labels of `group` and its hidden field value.
    pub fn set_tags(&mut self, group: &str, active: Vec<String>) {
        if active.is_empty() {
            self.field_values.remove(group);
            self.selected_tags.remove(group);
        } else {
            self.field_values.insert(group.to_string(), active.join("|"));
            self.selected_tags.insert(group.to_string(), active);
        }
    }

    /// Pulls `current_step` back into `[1, total]`.
    pub fn clamp_step(&mut self, total: u8) -> bool {
        let clamped = self.current_step.clamp(1, total.max(1));
        let changed = clamped != self.current_step;
        self.current_step = clamped;
        changed
    }
}

/// Root aggregate persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationState {
    pub current_view: View,
    pub parent_flow: FlowState,
    pub therapist_flow: FlowState,
    pub saved_matches: Vec<String>,
}

impl ApplicationState {
    pub fn flow(&self, kind: FlowKind) -> &FlowState {
        match kind {
            FlowKind::Parent => &self.parent_flow,
            FlowKind::Therapist => &self.therapist_flow,
        }
    }

    pub fn flow_mut(&mut self, kind: FlowKind) -> &mut FlowState {
        match kind {
            FlowKind::Parent => &mut self.parent_flow,
            FlowKind::Therapist => &mut self.therapist_flow,
        }
    }

    /// Enforces the step-range invariant on rehydrated data.
    pub fn normalize(&mut self) {
        for kind in FlowKind::ALL {
            let total = FlowDefinition::for_kind(kind).total_steps();
            if self.flow_mut(kind).clamp_step(total) {
                tracing::warn!(flow = %kind, "persisted step was out of range; clamped");
            }
        }
    }

    /// Adds or removes `id` from the saved matches. Returns whether it is saved afterwards.
    pub fn toggle_saved_match(&mut self, id: &str) -> bool {
        if let Some(index) = self.saved_matches.iter().position(|saved| saved == id) {
            self.saved_matches.remove(index);
            false
        } else {
            self.saved_matches.push(id.to_string());
            true
        }
    }
}

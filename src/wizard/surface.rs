//! The rendering capability the wizard drives.
//!
//! The wizard never touches a concrete UI. It asks a [`FormSurface`] for the
//! values of a panel's required fields, flags or clears field errors and
//! toggles which panel is visible. [`MemorySurface`] is the headless
//! implementation used by tests and wrapped by the terminal renderer.

use std::collections::BTreeMap;

use crate::domain::{FlowDefinition, FlowKind, StepDefinition};
use crate::messages;

use super::FlowOutcome;

/// Progress indicator contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub step: u8,
    pub total: u8,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.step as u32 * 100) / self.total as u32) as u8
    }

    pub fn label(&self) -> String {
        messages::progress(self.step, self.total)
    }
}

pub trait FormSurface {
    /// Current values of the required fields rendered on `step`.
    ///
    /// `None` means the panel is not rendered at all.
    fn required_field_values(&self, flow: FlowKind, step: u8) -> Option<BTreeMap<String, String>>;

    fn field_value(&self, flow: FlowKind, field: &str) -> Option<String>;

    fn set_field_value(&mut self, flow: FlowKind, field: &str, value: &str);

    fn set_field_error(&mut self, flow: FlowKind, field: &str, message: &str);

    fn clear_field_error(&mut self, flow: FlowKind, field: &str);

    /// Makes `step` the only visible panel of `flow`.
    fn show_panel(&mut self, flow: FlowKind, step: u8);

    fn hide_panels(&mut self, flow: FlowKind);

    fn show_progress(&mut self, flow: FlowKind, progress: Progress);

    fn show_outcome(&mut self, flow: FlowKind, outcome: FlowOutcome);

    fn hide_outcome(&mut self, flow: FlowKind);

    fn showing_outcome(&self, flow: FlowKind) -> bool;

    /// Clears every input and error of the flow's form.
    fn reset_fields(&mut self, flow: FlowKind);
}

#[derive(Debug, Clone)]
struct FormPanels {
    panels: Vec<StepDefinition>,
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    visible: Option<u8>,
    progress: Option<Progress>,
    outcome: Option<FlowOutcome>,
}

impl FormPanels {
    fn from_definition(definition: FlowDefinition) -> Self {
        Self {
            panels: definition.steps.to_vec(),
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            visible: None,
            progress: None,
            outcome: None,
        }
    }
}

/// In-memory form state for both flows.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    parent: FormPanels,
    therapist: FormPanels,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            parent: FormPanels::from_definition(FlowDefinition::for_kind(FlowKind::Parent)),
            therapist: FormPanels::from_definition(FlowDefinition::for_kind(FlowKind::Therapist)),
        }
    }

    /// Drops a panel, as when a page variant does not render it.
    pub fn without_panel(mut self, flow: FlowKind, step: u8) -> Self {
        self.form_mut(flow).panels.retain(|panel| panel.number != step);
        self
    }

    fn form(&self, flow: FlowKind) -> &FormPanels {
        match flow {
            FlowKind::Parent => &self.parent,
            FlowKind::Therapist => &self.therapist,
        }
    }

    fn form_mut(&mut self, flow: FlowKind) -> &mut FormPanels {
        match flow {
            FlowKind::Parent => &mut self.parent,
            FlowKind::Therapist => &mut self.therapist,
        }
    }

    pub fn visible_panel(&self, flow: FlowKind) -> Option<u8> {
        self.form(flow).visible
    }

    pub fn field_error(&self, flow: FlowKind, field: &str) -> Option<&str> {
        self.form(flow).errors.get(field).map(String::as_str)
    }

    pub fn field_errors(&self, flow: FlowKind) -> &BTreeMap<String, String> {
        &self.form(flow).errors
    }

    pub fn progress(&self, flow: FlowKind) -> Option<Progress> {
        self.form(flow).progress
    }

    pub fn outcome(&self, flow: FlowKind) -> Option<FlowOutcome> {
        self.form(flow).outcome
    }

    pub fn values(&self, flow: FlowKind) -> &BTreeMap<String, String> {
        &self.form(flow).values
    }
}

impl FormSurface for MemorySurface {
    fn required_field_values(&self, flow: FlowKind, step: u8) -> Option<BTreeMap<String, String>> {
        let form = self.form(flow);
        let panel = form.panels.iter().find(|panel| panel.number == step)?;
        Some(
            panel
                .required
                .iter()
                .map(|field| {
                    let value = form.values.get(*field).cloned().unwrap_or_default();
                    (field.to_string(), value)
                })
                .collect(),
        )
    }

    fn field_value(&self, flow: FlowKind, field: &str) -> Option<String> {
        self.form(flow).values.get(field).cloned()
    }

    fn set_field_value(&mut self, flow: FlowKind, field: &str, value: &str) {
        let form = self.form_mut(flow);
        if value.is_empty() {
            form.values.remove(field);
        } else {
            form.values.insert(field.to_string(), value.to_string());
        }
    }

    fn set_field_error(&mut self, flow: FlowKind, field: &str, message: &str) {
        self.form_mut(flow)
            .errors
            .insert(field.to_string(), message.to_string());
    }

    fn clear_field_error(&mut self, flow: FlowKind, field: &str) {
        self.form_mut(flow).errors.remove(field);
    }

    fn show_panel(&mut self, flow: FlowKind, step: u8) {
        let form = self.form_mut(flow);
        form.visible = form
            .panels
            .iter()
            .any(|panel| panel.number == step)
            .then_some(step);
    }

    fn hide_panels(&mut self, flow: FlowKind) {
        self.form_mut(flow).visible = None;
    }

    fn show_progress(&mut self, flow: FlowKind, progress: Progress) {
        self.form_mut(flow).progress = Some(progress);
    }

    fn show_outcome(&mut self, flow: FlowKind, outcome: FlowOutcome) {
        self.form_mut(flow).outcome = Some(outcome);
    }

    fn hide_outcome(&mut self, flow: FlowKind) {
        self.form_mut(flow).outcome = None;
    }

    fn showing_outcome(&self, flow: FlowKind) -> bool {
        self.form(flow).outcome.is_some()
    }

    fn reset_fields(&mut self, flow: FlowKind) {
        let form = self.form_mut(flow);
        form.values.clear();
        form.errors.clear();
    }
}

//! Step transitions for the parent and therapist flows.
//!
//! Forward moves are gated by validation of every step being left behind;
//! backward moves are always allowed. Every accepted transition is rendered on
//! the surface and persisted before the call returns.

use tracing::{debug, info};

use crate::domain::{ApplicationState, FlowDefinition, FlowKind, FlowState};
use crate::errors::WizardError;
use crate::messages;
use crate::notify::{Notifier, Severity};
use crate::storage::StatePersistence;

use super::surface::{FormSurface, Progress};
use super::validator::empty_fields;

/// What replaces the step panels once a flow is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Parent flow: the match results view.
    Results,
    /// Therapist flow: the registration success view.
    Success,
}

impl FlowOutcome {
    pub fn for_flow(flow: FlowKind) -> Self {
        match flow {
            FlowKind::Parent => FlowOutcome::Results,
            FlowKind::Therapist => FlowOutcome::Success,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChange {
    Moved { from: u8, to: u8 },
    Unchanged(u8),
}

/// Everything a transition reads or writes, borrowed from the owning session.
pub struct WizardContext<'a> {
    pub state: &'a mut ApplicationState,
    pub surface: &'a mut dyn FormSurface,
    pub notifier: &'a mut Notifier,
    pub store: &'a dyn StatePersistence,
}

#[derive(Debug, Clone, Copy)]
pub struct WizardMachine {
    parent: FlowDefinition,
    therapist: FlowDefinition,
}

impl Default for WizardMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardMachine {
    pub fn new() -> Self {
        Self {
            parent: FlowDefinition::for_kind(FlowKind::Parent),
            therapist: FlowDefinition::for_kind(FlowKind::Therapist),
        }
    }

    pub fn definition(&self, flow: FlowKind) -> FlowDefinition {
        match flow {
            FlowKind::Parent => self.parent,
            FlowKind::Therapist => self.therapist,
        }
    }

    pub fn total_steps(&self, flow: FlowKind) -> u8 {
        self.definition(flow).total_steps()
    }

    /// Shows the current panel and progress without changing anything.
    ///
    /// A submitted flow keeps its outcome and shows no panel.
    pub fn render(&self, ctx: &mut WizardContext<'_>, flow: FlowKind) {
        if ctx.surface.showing_outcome(flow) {
            return;
        }
        let step = ctx.state.flow(flow).current_step;
        self.display(ctx, flow, step);
    }

    /// Checks one step's required fields, flagging empty ones and clearing filled ones.
    ///
    /// A panel the surface does not render validates successfully.
    pub fn validate_step(
        &self,
        ctx: &mut WizardContext<'_>,
        flow: FlowKind,
        step: u8,
    ) -> Result<(), WizardError> {
        let Some(values) = ctx.surface.required_field_values(flow, step) else {
            debug!(%flow, step, "panel not rendered; skipping validation");
            return Ok(());
        };
        let missing = empty_fields(&values);
        for field in values.keys() {
            if missing.contains(field) {
                ctx.surface
                    .set_field_error(flow, field, messages::FIELD_REQUIRED);
            } else {
                ctx.surface.clear_field_error(flow, field);
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WizardError::MissingFields {
                step,
                fields: missing,
            })
        }
    }

    /// Advances towards `target`, validating every step in `[current, target)`.
    ///
    /// Targets at or behind the current step always succeed.
    pub fn next(
        &self,
        ctx: &mut WizardContext<'_>,
        flow: FlowKind,
        target: u8,
    ) -> Result<StepChange, WizardError> {
        self.check_range(flow, target)?;
        let current = ctx.state.flow(flow).current_step;
        if target <= current {
            return Ok(self.go_to(ctx, flow, target));
        }
        for step in current..target {
            if let Err(err) = self.validate_step(ctx, flow, step) {
                info!(%flow, step, target, "forward transition rejected");
                ctx.notifier
                    .notify(messages::FILL_REQUIRED_FIELDS, Severity::Warning);
                return Err(err);
            }
        }
        Ok(self.go_to(ctx, flow, target))
    }

    /// Advances exactly one step.
    pub fn next_step(
        &self,
        ctx: &mut WizardContext<'_>,
        flow: FlowKind,
    ) -> Result<StepChange, WizardError> {
        let current = ctx.state.flow(flow).current_step;
        let target = current.saturating_add(1).min(self.total_steps(flow));
        self.next(ctx, flow, target)
    }

    /// Moves back to `target` without validation.
    pub fn prev(
        &self,
        ctx: &mut WizardContext<'_>,
        flow: FlowKind,
        target: u8,
    ) -> Result<StepChange, WizardError> {
        self.check_range(flow, target)?;
        let current = ctx.state.flow(flow).current_step;
        if target > current {
            return Err(WizardError::NotBackward { current, target });
        }
        Ok(self.go_to(ctx, flow, target))
    }

    pub fn prev_step(
        &self,
        ctx: &mut WizardContext<'_>,
        flow: FlowKind,
    ) -> Result<StepChange, WizardError> {
        let current = ctx.state.flow(flow).current_step;
        self.prev(ctx, flow, current.saturating_sub(1).max(1))
    }

    /// Step-indicator click: backward is free, forward is validated.
    pub fn jump(
        &self,
        ctx: &mut WizardContext<'_>,
        flow: FlowKind,
        target: u8,
    ) -> Result<StepChange, WizardError> {
        if target > ctx.state.flow(flow).current_step {
            self.next(ctx, flow, target)
        } else {
            self.prev(ctx, flow, target)
        }
    }

    /// Resets the flow to its defaults and shows step 1.
    pub fn restart(&self, ctx: &mut WizardContext<'_>, flow: FlowKind) {
        *ctx.state.flow_mut(flow) = FlowState::default();
        ctx.surface.reset_fields(flow);
        ctx.surface.hide_outcome(flow);
        self.display(ctx, flow, 1);
        ctx.store.save(ctx.state);
        info!(%flow, "flow restarted");
        ctx.notifier.notify(messages::FLOW_RESTARTED, Severity::Info);
    }

    /// Completes the flow from its last step once every step validates.
    ///
    /// All steps are checked so every empty field gets flagged; the error
    /// reports the first failing step. `current_step` is left untouched.
    pub fn submit(
        &self,
        ctx: &mut WizardContext<'_>,
        flow: FlowKind,
    ) -> Result<FlowOutcome, WizardError> {
        let total = self.total_steps(flow);
        if ctx.state.flow(flow).current_step != total {
            return Err(WizardError::NotOnLastStep { flow });
        }
        let mut first_error = None;
        for step in 1..=total {
            if let Err(err) = self.validate_step(ctx, flow, step) {
                first_error.get_or_insert(err);
            }
        }
        if let Some(err) = first_error {
            ctx.notifier
                .notify(messages::FILL_REQUIRED_FIELDS, Severity::Warning);
            return Err(err);
        }

        let outcome = FlowOutcome::for_flow(flow);
        ctx.surface.hide_panels(flow);
        ctx.surface.show_outcome(flow, outcome);
        ctx.store.save(ctx.state);
        info!(%flow, ?outcome, "flow submitted");
        let message = match outcome {
            FlowOutcome::Results => messages::PARENT_RESULTS_READY,
            FlowOutcome::Success => messages::THERAPIST_REGISTERED,
        };
        ctx.notifier.notify(message, Severity::Success);
        Ok(outcome)
    }

    fn check_range(&self, flow: FlowKind, step: u8) -> Result<(), WizardError> {
        let total = self.total_steps(flow);
        if (1..=total).contains(&step) {
            Ok(())
        } else {
            Err(WizardError::StepOutOfRange { step, total })
        }
    }

    /// An accepted move leaves any submitted outcome; `Unchanged` keeps it on screen.
    fn go_to(&self, ctx: &mut WizardContext<'_>, flow: FlowKind, target: u8) -> StepChange {
        let from = ctx.state.flow(flow).current_step;
        if from == target {
            return StepChange::Unchanged(target);
        }
        ctx.state.flow_mut(flow).current_step = target;
        ctx.surface.hide_outcome(flow);
        self.display(ctx, flow, target);
        ctx.store.save(ctx.state);
        debug!(%flow, from, to = target, "step changed");
        StepChange::Moved { from, to: target }
    }

    fn display(&self, ctx: &mut WizardContext<'_>, flow: FlowKind, step: u8) {
        ctx.surface.show_panel(flow, step);
        ctx.surface.show_progress(
            flow,
            Progress {
                step,
                total: self.total_steps(flow),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StateStore};
    use crate::wizard::surface::MemorySurface;

    struct Harness {
        state: ApplicationState,
        surface: MemorySurface,
        notifier: Notifier,
        store: StateStore,
        machine: WizardMachine,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                state: ApplicationState::default(),
                surface: MemorySurface::new(),
                notifier: Notifier::default(),
                store: StateStore::with_default_slot(Box::new(MemoryStorage::new())),
                machine: WizardMachine::new(),
            }
        }

        fn ctx(&mut self) -> (WizardMachine, WizardContext<'_>) {
            (
                self.machine,
                WizardContext {
                    state: &mut self.state,
                    surface: &mut self.surface,
                    notifier: &mut self.notifier,
                    store: &self.store,
                },
            )
        }

        fn fill_step(&mut self, flow: FlowKind, step: u8) {
            for field in FlowDefinition::for_kind(flow).required_fields(step) {
                self.surface.set_field_value(flow, field, "ערך");
            }
        }
    }

    #[test]
    fn next_with_empty_required_field_stays_put() {
        let mut harness = Harness::new();
        harness.surface.set_field_value(FlowKind::Parent, "child_age", "6");
        harness.surface.set_field_value(FlowKind::Parent, "city", "חיפה");
        let (machine, mut ctx) = harness.ctx();

        let err = machine.next(&mut ctx, FlowKind::Parent, 2).unwrap_err();
        assert_eq!(
            err,
            WizardError::MissingFields {
                step: 1,
                fields: vec!["child_name".into()]
            }
        );
        assert_eq!(harness.state.parent_flow.current_step, 1);
        assert_eq!(
            harness.surface.field_error(FlowKind::Parent, "child_name"),
            Some(messages::FIELD_REQUIRED)
        );
        assert!(harness.surface.field_error(FlowKind::Parent, "city").is_none());
        let toast = harness.notifier.latest().expect("warning toast");
        assert_eq!(toast.severity, Severity::Warning);
    }

    #[test]
    fn next_moves_one_step_and_persists() {
        let mut harness = Harness::new();
        harness.fill_step(FlowKind::Parent, 1);
        let (machine, mut ctx) = harness.ctx();
        let change = machine.next_step(&mut ctx, FlowKind::Parent).expect("advance");
        assert_eq!(change, StepChange::Moved { from: 1, to: 2 });
        assert_eq!(harness.surface.visible_panel(FlowKind::Parent), Some(2));
        assert_eq!(
            harness.surface.progress(FlowKind::Parent),
            Some(Progress { step: 2, total: 4 })
        );
        assert_eq!(harness.store.load().parent_flow.current_step, 2);
    }

    #[test]
    fn forward_jump_validates_every_intermediate_step() {
        let mut harness = Harness::new();
        harness.fill_step(FlowKind::Therapist, 1);
        harness.fill_step(FlowKind::Therapist, 3);
        let (machine, mut ctx) = harness.ctx();

        let err = machine.jump(&mut ctx, FlowKind::Therapist, 4).unwrap_err();
        assert!(matches!(err, WizardError::MissingFields { step: 2, .. }));
        assert_eq!(harness.state.therapist_flow.current_step, 1);

        harness.fill_step(FlowKind::Therapist, 2);
        let (machine, mut ctx) = harness.ctx();
        let change = machine.jump(&mut ctx, FlowKind::Therapist, 4).expect("jump");
        assert_eq!(change, StepChange::Moved { from: 1, to: 4 });
    }

    #[test]
    fn backward_moves_never_validate() {
        let mut harness = Harness::new();
        harness.state.parent_flow.current_step = 4;
        let (machine, mut ctx) = harness.ctx();
        assert_eq!(
            machine.prev(&mut ctx, FlowKind::Parent, 2),
            Ok(StepChange::Moved { from: 4, to: 2 })
        );
        assert_eq!(
            machine.jump(&mut ctx, FlowKind::Parent, 1),
            Ok(StepChange::Moved { from: 2, to: 1 })
        );
        assert_eq!(
            machine.prev(&mut ctx, FlowKind::Parent, 3),
            Err(WizardError::NotBackward {
                current: 1,
                target: 3
            })
        );
        assert!(harness.surface.field_errors(FlowKind::Parent).is_empty());
    }

    #[test]
    fn out_of_range_targets_are_rejected() {
        let mut harness = Harness::new();
        let (machine, mut ctx) = harness.ctx();
        assert_eq!(
            machine.next(&mut ctx, FlowKind::Parent, 5),
            Err(WizardError::StepOutOfRange { step: 5, total: 4 })
        );
        assert_eq!(
            machine.prev(&mut ctx, FlowKind::Parent, 0),
            Err(WizardError::StepOutOfRange { step: 0, total: 4 })
        );
        assert_eq!(harness.state.parent_flow.current_step, 1);
    }

    #[test]
    fn missing_panel_does_not_block() {
        let mut harness = Harness::new();
        harness.surface = MemorySurface::new().without_panel(FlowKind::Parent, 1);
        let (machine, mut ctx) = harness.ctx();
        assert!(machine.next(&mut ctx, FlowKind::Parent, 2).is_ok());
    }

    #[test]
    fn submit_requires_last_step_and_keeps_step() {
        let mut harness = Harness::new();
        for step in 1..=4 {
            harness.fill_step(FlowKind::Therapist, step);
        }
        let (machine, mut ctx) = harness.ctx();
        assert_eq!(
            machine.submit(&mut ctx, FlowKind::Therapist),
            Err(WizardError::NotOnLastStep {
                flow: FlowKind::Therapist
            })
        );
        machine.next(&mut ctx, FlowKind::Therapist, 4).expect("jump to end");
        assert_eq!(
            machine.submit(&mut ctx, FlowKind::Therapist),
            Ok(FlowOutcome::Success)
        );
        assert_eq!(harness.state.therapist_flow.current_step, 4);
        assert_eq!(harness.surface.visible_panel(FlowKind::Therapist), None);
        assert_eq!(
            harness.surface.outcome(FlowKind::Therapist),
            Some(FlowOutcome::Success)
        );
    }

    #[test]
    fn stepping_back_after_submit_hides_the_outcome() {
        let mut harness = Harness::new();
        for step in 1..=4 {
            harness.fill_step(FlowKind::Parent, step);
        }
        harness.state.parent_flow.current_step = 4;
        let (machine, mut ctx) = harness.ctx();
        machine.submit(&mut ctx, FlowKind::Parent).expect("submit");
        assert_eq!(
            machine.next_step(&mut ctx, FlowKind::Parent),
            Ok(StepChange::Unchanged(4))
        );
        assert_eq!(
            harness.surface.outcome(FlowKind::Parent),
            Some(FlowOutcome::Results)
        );
        assert_eq!(harness.surface.visible_panel(FlowKind::Parent), None);

        let (machine, mut ctx) = harness.ctx();
        machine.render(&mut ctx, FlowKind::Parent);
        assert_eq!(harness.surface.visible_panel(FlowKind::Parent), None);

        let (machine, mut ctx) = harness.ctx();
        assert_eq!(
            machine.prev_step(&mut ctx, FlowKind::Parent),
            Ok(StepChange::Moved { from: 4, to: 3 })
        );
        assert_eq!(harness.surface.visible_panel(FlowKind::Parent), Some(3));
        assert_eq!(harness.surface.outcome(FlowKind::Parent), None);
    }

    #[test]
    fn submit_flags_every_empty_field() {
        let mut harness = Harness::new();
        harness.state.parent_flow.current_step = 4;
        harness.fill_step(FlowKind::Parent, 4);
        let (machine, mut ctx) = harness.ctx();
        let err = machine.submit(&mut ctx, FlowKind::Parent).unwrap_err();
        assert!(matches!(err, WizardError::MissingFields { step: 1, .. }));
        let errors = harness.surface.field_errors(FlowKind::Parent);
        assert!(errors.contains_key("child_name"));
        assert!(errors.contains_key("meeting_type"));
        assert!(!errors.contains_key("parent_email"));
        assert_eq!(harness.surface.outcome(FlowKind::Parent), None);
    }

    #[test]
    fn restart_resets_flow_state() {
        let mut harness = Harness::new();
        harness.state.parent_flow.current_step = 3;
        harness
            .state
            .parent_flow
            .field_values
            .insert("child_name".into(), "נועה".into());
        harness.surface.set_field_value(FlowKind::Parent, "child_name", "נועה");
        harness
            .surface
            .show_outcome(FlowKind::Parent, FlowOutcome::Results);
        let (machine, mut ctx) = harness.ctx();
        machine.restart(&mut ctx, FlowKind::Parent);

        assert_eq!(harness.state.parent_flow, FlowState::default());
        assert!(harness.surface.values(FlowKind::Parent).is_empty());
        assert_eq!(harness.surface.visible_panel(FlowKind::Parent), Some(1));
        assert_eq!(harness.surface.outcome(FlowKind::Parent), None);
        assert_eq!(harness.store.load().parent_flow, FlowState::default());
    }
}

//! Wizard transitions, field input, chips and file uploads.

use tracing::{debug, info, warn};

use crate::domain::steps::{
    PARENT_MAIN_TREATMENT, PARENT_SUB_SPECIALTY, THERAPIST_MAIN_FIELDS, THERAPIST_SUB_FIELDS,
};
use crate::domain::{format_file_size, FileDescriptor, FlowKind};
use crate::errors::{OptionError, SessionError, UploadError};
use crate::messages;
use crate::notify::Severity;
use crate::wizard::{resolve_subspecialties, FlowOutcome, FormSurface, StepChange};

use super::{Deferred, Session};

impl<S: FormSurface> Session<S> {
    /// Advances `flow` by one step.
    pub fn next(&mut self, flow: FlowKind) -> Result<StepChange, SessionError> {
        let (machine, mut ctx) = self.wizard();
        Ok(machine.next_step(&mut ctx, flow)?)
    }

    pub fn back(&mut self, flow: FlowKind) -> Result<StepChange, SessionError> {
        let (machine, mut ctx) = self.wizard();
        Ok(machine.prev_step(&mut ctx, flow)?)
    }

    /// Step-indicator click.
    pub fn goto(&mut self, flow: FlowKind, step: u8) -> Result<StepChange, SessionError> {
        let (machine, mut ctx) = self.wizard();
        Ok(machine.jump(&mut ctx, flow, step)?)
    }

    pub fn restart(&mut self, flow: FlowKind) {
        let (machine, mut ctx) = self.wizard();
        machine.restart(&mut ctx, flow);
        match flow {
            FlowKind::Parent => {
                if let Some(handle) = self.reveal_task.take() {
                    self.scheduler.cancel(handle);
                }
                self.results.reset();
                self.booking.close();
                self.sub_specialties.clear();
            }
            FlowKind::Therapist => self.slots.clear(),
        }
    }

    /// Submits `flow` from its last step. Parent results are revealed after a short delay.
    pub fn submit(&mut self, flow: FlowKind) -> Result<FlowOutcome, SessionError> {
        let (machine, mut ctx) = self.wizard();
        let outcome = machine.submit(&mut ctx, flow)?;
        if outcome == FlowOutcome::Results {
            let cards = self.matches.matches(&self.state.parent_flow);
            debug!(count = cards.len(), "result cards loaded");
            self.results.load(cards);
            if let Some(stale) = self.reveal_task.take() {
                self.scheduler.cancel(stale);
            }
            self.reveal_task = Some(
                self.scheduler
                    .schedule(self.config.results_reveal_delay(), Deferred::RevealResults),
            );
        }
        Ok(outcome)
    }

    /// Records a text or select input.
    ///
    /// Chip groups are rejected here; they change through [`Session::toggle_chip`].
    pub fn set_field(&mut self, flow: FlowKind, field: &str, value: &str) -> Result<(), SessionError> {
        if self.machine.definition(flow).step_of(field).is_none() {
            return Err(SessionError::UnknownField {
                flow,
                field: field.to_string(),
            });
        }
        if self.chip_options(flow, field).is_some() {
            return Err(SessionError::ChipField(field.to_string()));
        }

        let trimmed = value.trim();
        let mut stored = value.to_string();
        if flow == FlowKind::Parent && !trimmed.is_empty() {
            if field == PARENT_MAIN_TREATMENT {
                let entry = self
                    .catalog
                    .find(trimmed)
                    .ok_or_else(|| not_offered(field, trimmed))?;
                stored = entry.label.to_string();
            } else if field == PARENT_SUB_SPECIALTY
                && !self.sub_specialties.iter().any(|option| option == trimmed)
            {
                return Err(not_offered(field, trimmed));
            }
        }

        self.write_field(flow, field, &stored);
        if flow == FlowKind::Parent && field == PARENT_MAIN_TREATMENT {
            self.refresh_sub_specialties();
        }
        self.persist();
        Ok(())
    }

    fn write_field(&mut self, flow: FlowKind, field: &str, value: &str) {
        self.surface.set_field_value(flow, field, value);
        let values = &mut self.state.flow_mut(flow).field_values;
        if value.is_empty() {
            values.remove(field);
        } else {
            values.insert(field.to_string(), value.to_string());
        }
        if !value.trim().is_empty() {
            self.surface.clear_field_error(flow, field);
        }
    }

    /// Re-renders the sub-specialty select and clears a value it no longer offers.
    pub(crate) fn refresh_sub_specialties(&mut self) {
        self.sub_specialties = match self.state.parent_flow.field(PARENT_MAIN_TREATMENT) {
            Some(main) => resolve_subspecialties(&self.catalog, &[main]),
            None => Vec::new(),
        };
        let stale = self
            .state
            .parent_flow
            .field(PARENT_SUB_SPECIALTY)
            .filter(|current| !self.sub_specialties.iter().any(|option| option == current))
            .map(str::to_string);
        if let Some(stale) = stale {
            debug!(value = %stale, "sub-specialty no longer offered; cleared");
            self.write_field(FlowKind::Parent, PARENT_SUB_SPECIALTY, "");
        }
    }

    /// Labels currently rendered by chip group `group`, or `None` if it is not a chip group.
    pub fn chip_options(&self, flow: FlowKind, group: &str) -> Option<Vec<String>> {
        match (flow, group) {
            (FlowKind::Therapist, THERAPIST_MAIN_FIELDS) => Some(self.catalog.labels()),
            (FlowKind::Therapist, THERAPIST_SUB_FIELDS) => Some(self.slots.options()),
            _ => self
                .machine
                .definition(flow)
                .chip_group(group)
                .map(|chips| chips.options.iter().map(|option| option.to_string()).collect()),
        }
    }

    /// Flips one chip. Returns whether it is active afterwards.
    pub fn toggle_chip(&mut self, flow: FlowKind, group: &str, label: &str) -> Result<bool, SessionError> {
        let options = self
            .chip_options(flow, group)
            .ok_or_else(|| SessionError::UnknownChipGroup(group.to_string()))?;
        let label = label.trim();
        if !options.iter().any(|option| option == label) {
            return Err(not_offered(group, label));
        }

        let active = if flow == FlowKind::Therapist && group == THERAPIST_MAIN_FIELDS {
            self.toggle_main_field(label)?
        } else {
            let active = self.state.flow_mut(flow).toggle_tag(group, label, &options);
            self.sync_chip_field(flow, group);
            active
        };
        self.persist();
        Ok(active)
    }

    fn toggle_main_field(&mut self, label: &str) -> Result<bool, SessionError> {
        let active = if self.slots.contains(label) {
            self.slots.remove(label);
            false
        } else {
            if let Err(err) = self.slots.add(label) {
                if matches!(err, OptionError::LimitReached { .. }) {
                    self.notifier
                        .notify(messages::CATEGORY_LIMIT, Severity::Warning);
                }
                return Err(err.into());
            }
            true
        };
        self.sync_main_fields();
        Ok(active)
    }

    /// Places a category into one of the fixed category selects of the therapist flow.
    pub fn select_category_slot(&mut self, slot: usize, category: &str) -> Result<(), SessionError> {
        if let Err(err) = self.slots.select(slot, category) {
            if matches!(err, OptionError::AlreadySelected { .. }) {
                self.notifier
                    .notify(messages::CATEGORY_TAKEN, Severity::Warning);
            }
            return Err(err.into());
        }
        self.sync_main_fields();
        self.persist();
        Ok(())
    }

    /// Empties one category select, like choosing its blank option.
    pub fn clear_category_slot(&mut self, slot: usize) -> Result<(), SessionError> {
        if let Some(cleared) = self.slots.clear_slot(slot)? {
            debug!(slot, category = cleared.key, "category slot cleared");
        }
        self.sync_main_fields();
        self.persist();
        Ok(())
    }

    /// Rewrites the main-field tags from the slots and prunes orphaned sub selections.
    pub(crate) fn sync_main_fields(&mut self) {
        let options = self.slots.options();
        let flow = &mut self.state.therapist_flow;
        flow.set_tags(THERAPIST_MAIN_FIELDS, self.slots.selected_labels());
        let pruned = flow.retain_tags(THERAPIST_SUB_FIELDS, &options);
        if !pruned.is_empty() {
            debug!(?pruned, "orphaned sub-specialties pruned");
        }
        self.sync_chip_field(FlowKind::Therapist, THERAPIST_MAIN_FIELDS);
        self.sync_chip_field(FlowKind::Therapist, THERAPIST_SUB_FIELDS);
    }

    fn sync_chip_field(&mut self, flow: FlowKind, group: &str) {
        let value = self
            .state
            .flow(flow)
            .field(group)
            .unwrap_or_default()
            .to_string();
        self.surface.set_field_value(flow, group, &value);
        if !value.is_empty() {
            self.surface.clear_field_error(flow, group);
        }
    }

    /// Accepts an uploaded file up to the configured size limit.
    pub fn upload_file(&mut self, flow: FlowKind, file: FileDescriptor) -> Result<(), SessionError> {
        let limit = self.config.max_upload_bytes;
        if file.size_bytes > limit {
            warn!(file = %file.name, size = file.size_bytes, limit, "upload rejected");
            self.notifier.notify(
                messages::file_too_large(&file.name, &format_file_size(limit)),
                Severity::Error,
            );
            return Err(UploadError::TooLarge {
                name: file.name,
                limit,
            }
            .into());
        }
        info!(%flow, file = %file.name, size = file.size_bytes, "file uploaded");
        self.notifier
            .notify(messages::file_uploaded(&file.name), Severity::Success);
        self.state
            .flow_mut(flow)
            .uploaded_file_descriptors
            .push(file);
        self.persist();
        Ok(())
    }

    pub fn remove_file(&mut self, flow: FlowKind, name: &str) -> Result<FileDescriptor, SessionError> {
        let files = &mut self.state.flow_mut(flow).uploaded_file_descriptors;
        let index = files
            .iter()
            .position(|file| file.name == name)
            .ok_or_else(|| UploadError::NotFound(name.to_string()))?;
        let removed = files.remove(index);
        self.notifier
            .notify(messages::file_removed(&removed.name), Severity::Info);
        self.persist();
        Ok(removed)
    }
}

fn not_offered(field: &str, value: &str) -> SessionError {
    SessionError::NotOffered {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::domain::steps::{THERAPIST_MAIN_FIELDS, THERAPIST_SUB_FIELDS};
    use crate::domain::{FileDescriptor, FlowKind, SpecializationCatalog, MAX_UPLOAD_BYTES};
    use crate::errors::{OptionError, SessionError, UploadError, WizardError};
    use crate::notify::Severity;
    use crate::storage::StatePersistence;
    use crate::wizard::{resolve_subspecialties, FormSurface, StepChange};

    use crate::app::Session;

    fn session() -> Session {
        Session::in_memory(Config::default())
    }

    fn label(key: &str) -> &'static str {
        SpecializationCatalog::standard()
            .find(key)
            .expect("catalog entry")
            .label
    }

    #[test]
    fn parent_step_one_requires_child_name() {
        let mut session = session();
        session.set_field(FlowKind::Parent, "child_age", "5").unwrap();
        session.set_field(FlowKind::Parent, "city", "חיפה").unwrap();
        let err = session.next(FlowKind::Parent).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Wizard(WizardError::MissingFields { step: 1, .. })
        ));
        assert_eq!(session.state().parent_flow.current_step, 1);
        assert!(session
            .surface()
            .field_error(FlowKind::Parent, "child_name")
            .is_some());
        assert_eq!(
            session.toasts().last().map(|toast| toast.severity),
            Some(Severity::Warning)
        );

        session.set_field(FlowKind::Parent, "child_name", "נועה").unwrap();
        assert!(session
            .surface()
            .field_error(FlowKind::Parent, "child_name")
            .is_none());
        assert_eq!(
            session.next(FlowKind::Parent).unwrap(),
            StepChange::Moved { from: 1, to: 2 }
        );
    }

    #[test]
    fn main_treatment_drives_sub_specialty_options() {
        let mut session = session();
        session.set_field(FlowKind::Parent, "main_treatment", "speech").unwrap();
        assert_eq!(
            session.state().parent_flow.field("main_treatment"),
            Some(label("speech"))
        );
        let speech_subs = session.sub_specialty_options().to_vec();
        assert!(!speech_subs.is_empty());
        session
            .set_field(FlowKind::Parent, "sub_specialty", &speech_subs[0])
            .unwrap();

        session.set_field(FlowKind::Parent, "main_treatment", "ot").unwrap();
        assert_eq!(
            session.sub_specialty_options(),
            resolve_subspecialties(&SpecializationCatalog::standard(), &["ot"]).as_slice()
        );
        assert_eq!(session.state().parent_flow.field("sub_specialty"), None);
        assert_eq!(
            session.surface().field_value(FlowKind::Parent, "sub_specialty"),
            None
        );
        assert!(matches!(
            session.set_field(FlowKind::Parent, "sub_specialty", &speech_subs[0]),
            Err(SessionError::NotOffered { .. })
        ));
    }

    #[test]
    fn unknown_fields_and_chip_groups_are_rejected_by_set_field() {
        let mut session = session();
        assert!(matches!(
            session.set_field(FlowKind::Parent, "license_number", "1"),
            Err(SessionError::UnknownField { .. })
        ));
        assert!(matches!(
            session.set_field(FlowKind::Parent, "parent_preferences", "x"),
            Err(SessionError::ChipField(_))
        ));
    }

    #[test]
    fn chips_write_joined_hidden_value_in_rendered_order() {
        let mut session = session();
        let options = session
            .chip_options(FlowKind::Parent, "parent_preferences")
            .expect("preferences chips");
        assert!(session
            .toggle_chip(FlowKind::Parent, "parent_preferences", &options[2])
            .unwrap());
        assert!(session
            .toggle_chip(FlowKind::Parent, "parent_preferences", &options[0])
            .unwrap());
        let expected = format!("{}|{}", options[0], options[2]);
        assert_eq!(
            session.state().parent_flow.field("parent_preferences"),
            Some(expected.as_str())
        );
        assert!(!session
            .toggle_chip(FlowKind::Parent, "parent_preferences", &options[0])
            .unwrap());
        assert_eq!(
            session.state().parent_flow.tags("parent_preferences"),
            &[options[2].clone()]
        );
        assert_eq!(
            session.store().load().parent_flow.tags("parent_preferences"),
            &[options[2].clone()]
        );
    }

    #[test]
    fn deselecting_a_main_field_prunes_its_sub_fields() {
        let mut session = session();
        let speech = label("speech");
        let ot = label("ot");
        session
            .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, speech)
            .unwrap();
        session
            .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, ot)
            .unwrap();
        let catalog = SpecializationCatalog::standard();
        let speech_sub = catalog.find("speech").unwrap().subs[0];
        let ot_sub = catalog.find("ot").unwrap().subs[0];
        session
            .toggle_chip(FlowKind::Therapist, THERAPIST_SUB_FIELDS, speech_sub)
            .unwrap();
        session
            .toggle_chip(FlowKind::Therapist, THERAPIST_SUB_FIELDS, ot_sub)
            .unwrap();

        session
            .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, speech)
            .unwrap();
        let flow = &session.state().therapist_flow;
        assert_eq!(flow.tags(THERAPIST_MAIN_FIELDS), &[ot.to_string()]);
        assert_eq!(flow.tags(THERAPIST_SUB_FIELDS), &[ot_sub.to_string()]);
        assert_eq!(flow.field(THERAPIST_SUB_FIELDS), Some(ot_sub));
        assert!(matches!(
            session.toggle_chip(FlowKind::Therapist, THERAPIST_SUB_FIELDS, speech_sub),
            Err(SessionError::NotOffered { .. })
        ));
    }

    #[test]
    fn deselecting_the_last_main_field_empties_the_group() {
        let mut session = session();
        let speech = label("speech");
        session
            .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, speech)
            .unwrap();
        assert!(!session
            .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, speech)
            .unwrap());

        assert_eq!(session.category_slots().selected().count(), 0);
        let flow = &session.state().therapist_flow;
        assert!(flow.tags(THERAPIST_MAIN_FIELDS).is_empty());
        assert_eq!(flow.field(THERAPIST_MAIN_FIELDS), None);
        let saved = session.store().load();
        assert!(saved.therapist_flow.tags(THERAPIST_MAIN_FIELDS).is_empty());
        assert!(!saved
            .therapist_flow
            .selected_tags
            .contains_key(THERAPIST_MAIN_FIELDS));
    }

    #[test]
    fn clearing_a_slot_drops_its_category_and_sub_fields() {
        let mut session = session();
        session.select_category_slot(0, "speech").unwrap();
        session.select_category_slot(1, "ot").unwrap();
        let speech_sub = SpecializationCatalog::standard().find("speech").unwrap().subs[0];
        session
            .toggle_chip(FlowKind::Therapist, THERAPIST_SUB_FIELDS, speech_sub)
            .unwrap();

        session.clear_category_slot(0).unwrap();
        let flow = &session.state().therapist_flow;
        assert_eq!(flow.tags(THERAPIST_MAIN_FIELDS), &[label("ot").to_string()]);
        assert!(flow.tags(THERAPIST_SUB_FIELDS).is_empty());

        session.clear_category_slot(1).unwrap();
        assert_eq!(session.state().therapist_flow.field(THERAPIST_MAIN_FIELDS), None);
        assert!(session
            .store()
            .load()
            .therapist_flow
            .tags(THERAPIST_MAIN_FIELDS)
            .is_empty());
        assert!(matches!(
            session.clear_category_slot(5),
            Err(SessionError::Option(OptionError::SlotOutOfRange { slot: 5, .. }))
        ));
    }

    #[test]
    fn fourth_main_field_hits_the_limit() {
        let mut session = session();
        for key in ["speech", "ot", "physio"] {
            session
                .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, label(key))
                .unwrap();
        }
        let err = session
            .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, label("psychology"))
            .unwrap_err();
        assert_eq!(err, SessionError::Option(OptionError::LimitReached { max: 3 }));
        assert_eq!(
            session.toasts().last().map(|toast| toast.severity),
            Some(Severity::Warning)
        );
        assert_eq!(session.category_slots().selected().count(), 3);
    }

    #[test]
    fn duplicate_slot_selection_is_rejected() {
        let mut session = session();
        session.select_category_slot(0, "speech").unwrap();
        let err = session.select_category_slot(2, "speech").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Option(OptionError::AlreadySelected { slot: 0, .. })
        ));
        assert_eq!(
            session.state().therapist_flow.tags(THERAPIST_MAIN_FIELDS),
            &[label("speech").to_string()]
        );
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let mut session = session();
        let big = FileDescriptor::new("scan.pdf", MAX_UPLOAD_BYTES + 1, "application/pdf");
        let err = session.upload_file(FlowKind::Parent, big).unwrap_err();
        assert!(matches!(err, SessionError::Upload(UploadError::TooLarge { .. })));
        assert!(session
            .state()
            .parent_flow
            .uploaded_file_descriptors
            .is_empty());
        assert_eq!(
            session.toasts().last().map(|toast| toast.severity),
            Some(Severity::Error)
        );

        let small = FileDescriptor::new("report.pdf", 2048, "application/pdf");
        session.upload_file(FlowKind::Parent, small).unwrap();
        assert_eq!(
            session
                .store()
                .load()
                .parent_flow
                .uploaded_file_descriptors
                .len(),
            1
        );
        assert!(session.remove_file(FlowKind::Parent, "report.pdf").is_ok());
        assert!(matches!(
            session.remove_file(FlowKind::Parent, "report.pdf"),
            Err(SessionError::Upload(UploadError::NotFound(_)))
        ));
    }

    #[test]
    fn restart_clears_therapist_slots() {
        let mut session = session();
        session.select_category_slot(1, "ot").unwrap();
        session.restart(FlowKind::Therapist);
        assert_eq!(session.category_slots().selected().count(), 0);
        assert!(session
            .state()
            .therapist_flow
            .tags(THERAPIST_MAIN_FIELDS)
            .is_empty());
        assert_eq!(session.surface().visible_panel(FlowKind::Therapist), Some(1));
    }
}

//! The session: explicitly constructed owner of the application state and
//! every collaborator the handlers need.
//!
//! Each user action of the site maps to one method on [`Session`]. Handlers
//! run one at a time; every mutation is persisted before the handler returns.
//! Timer-style continuations are queued on a virtual-clock [`Scheduler`] and
//! run by [`Session::advance`].

mod booking;
mod flows;
mod insurance;

use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use crate::autocomplete::CityAutocomplete;
use crate::config::Config;
use crate::domain::{ApplicationState, FlowKind, SpecializationCatalog, View};
use crate::errors::SessionError;
use crate::insurance::{InsurancePanel, PolicyAnalyzer, StaticPolicyAnalyzer};
use crate::messages;
use crate::notify::{Notifier, Severity, Toast, ToastSink};
use crate::presenter::{
    BookingFlow, DemoScreen, DemoScreens, MatchSource, MockScheduler, RandomAvailability, ResultsView, SchedulingBackend,
    StaticMatches, TherapistDirectory,
};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::storage::{MemoryStorage, StatePersistence, StateStore};
use crate::wizard::{CategorySlots, FormSurface, MemorySurface, WizardContext, WizardMachine};

/// Work queued for later, run when the virtual clock reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    RevealResults,
    CompleteAnalysis,
    BookingNotice,
}

pub struct Session<S: FormSurface = MemorySurface> {
    config: Config,
    state: ApplicationState,
    store: StateStore,
    notifier: Notifier,
    scheduler: Scheduler<Deferred>,
    surface: S,
    machine: WizardMachine,
    catalog: SpecializationCatalog,
    slots: CategorySlots,
    sub_specialties: Vec<String>,
    results: ResultsView,
    reveal_task: Option<TaskHandle>,
    matches: Box<dyn MatchSource>,
    booking: BookingFlow,
    backend: Box<dyn SchedulingBackend>,
    insurance: InsurancePanel,
    analyzer: Box<dyn PolicyAnalyzer>,
    autocomplete: CityAutocomplete,
    demo: DemoScreens,
}

impl Session<MemorySurface> {
    /// Headless session backed by in-memory storage.
    pub fn in_memory(config: Config) -> Self {
        let store = StateStore::new(Box::new(MemoryStorage::new()), config.storage_slot.clone());
        Self::open(config, store, MemorySurface::new())
    }
}

impl<S: FormSurface> Session<S> {
    /// Rehydrates state from `store` and renders both flows on `surface`.
    pub fn open(config: Config, store: StateStore, surface: S) -> Self {
        let state = store.load();
        let catalog = SpecializationCatalog::standard();
        let availability =
            RandomAvailability::new(config.availability_ratio, config.availability_seed);
        let mut session = Self {
            notifier: Notifier::new(config.toast_lifetime()),
            scheduler: Scheduler::new(),
            surface,
            machine: WizardMachine::new(),
            catalog,
            slots: CategorySlots::new(catalog),
            sub_specialties: Vec::new(),
            results: ResultsView::default(),
            reveal_task: None,
            matches: Box::new(StaticMatches),
            booking: BookingFlow::default(),
            backend: Box::new(MockScheduler::new(
                Box::new(availability),
                TherapistDirectory::standard(),
            )),
            insurance: InsurancePanel::default(),
            analyzer: Box::new(StaticPolicyAnalyzer),
            autocomplete: CityAutocomplete::default(),
            demo: DemoScreens::default(),
            config,
            state,
            store,
        };
        session.hydrate();
        info!(
            view = session.state.current_view.id(),
            slot = session.store.slot(),
            "session opened"
        );
        session
    }

    pub fn with_toast_sink(mut self, sink: Box<dyn ToastSink>) -> Self {
        self.notifier.set_sink(sink);
        self
    }

    pub fn with_scheduling_backend(mut self, backend: Box<dyn SchedulingBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_match_source(mut self, matches: Box<dyn MatchSource>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_policy_analyzer(mut self, analyzer: Box<dyn PolicyAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    fn hydrate(&mut self) {
        for flow in FlowKind::ALL {
            let values: Vec<(String, String)> = self
                .state
                .flow(flow)
                .field_values
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            for (field, value) in &values {
                self.surface.set_field_value(flow, field, value);
            }
            let (machine, mut ctx) = self.wizard();
            machine.render(&mut ctx, flow);
        }
        let main_fields = self
            .state
            .therapist_flow
            .tags(crate::domain::steps::THERAPIST_MAIN_FIELDS)
            .to_vec();
        self.slots = CategorySlots::from_labels(self.catalog, &main_fields);
        self.sync_main_fields();
        self.refresh_sub_specialties();
    }

    pub(crate) fn wizard(&mut self) -> (WizardMachine, WizardContext<'_>) {
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

    pub(crate) fn persist(&self) {
        self.store.save(&self.state);
    }

    /// Switches the visible view. Leaving the insurance view drops its pending analysis.
    pub fn show_view(&mut self, view: View) {
        let previous = self.state.current_view;
        if previous == View::Insurance && view != View::Insurance {
            if let Some(handle) = self.insurance.tear_down() {
                self.scheduler.cancel(handle);
                info!("pending policy analysis cancelled");
            }
        }
        self.state.current_view = view;
        if let Some(flow) = FlowKind::ALL.into_iter().find(|flow| flow.view() == view) {
            let (machine, mut ctx) = self.wizard();
            machine.render(&mut ctx, flow);
        }
        self.persist();
        debug!(from = previous.id(), to = view.id(), "view changed");
        self.notifier
            .notify(messages::view_opened(view.display_name()), Severity::Info);
    }

    /// Demo menu click: opens the demo center on screen `id`.
    pub fn switch_demo(&mut self, id: &str) -> Result<&'static DemoScreen, SessionError> {
        let screen = self
            .demo
            .switch(id)
            .ok_or_else(|| SessionError::UnknownDemoScreen(id.to_string()))?;
        if self.state.current_view != View::DemoCenter {
            self.show_view(View::DemoCenter);
        }
        Ok(screen)
    }

    /// Moves the virtual clock, expires toasts and runs every continuation now due.
    ///
    /// Returns how many continuations ran.
    pub fn advance(&mut self, by: Duration) -> usize {
        let due = self.scheduler.advance(by);
        self.notifier.expire(self.scheduler.now());
        let ran = due.len();
        for (handle, task) in due {
            self.run_deferred(handle, task);
        }
        ran
    }

    fn run_deferred(&mut self, handle: TaskHandle, task: Deferred) {
        debug!(?handle, ?task, "running continuation");
        match task {
            Deferred::RevealResults => {
                if self.reveal_task == Some(handle) {
                    self.reveal_task = None;
                }
                if !self.results.reveal() {
                    debug!("results were reset before the reveal");
                }
            }
            Deferred::CompleteAnalysis => {
                if self
                    .insurance
                    .complete_analysis(handle, self.analyzer.as_ref())
                {
                    self.notifier
                        .notify(messages::ANALYSIS_DONE, Severity::Success);
                }
            }
            Deferred::BookingNotice => {
                self.notifier
                    .notify(messages::BOOKING_EMAIL_SENT, Severity::Success);
            }
        }
    }

    pub fn dismiss_toast(&mut self, id: Uuid) -> bool {
        self.notifier.dismiss(id)
    }

    pub fn toasts(&self) -> &[Toast] {
        self.notifier.active()
    }

    pub fn city_suggestions(&self, input: &str) -> Vec<&'static str> {
        self.autocomplete.suggest(input)
    }

    /// Writes the final snapshot.
    pub fn shutdown(&mut self) {
        self.persist();
        info!(pending = self.scheduler.pending_count(), "session closed");
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    pub fn booking(&self) -> &BookingFlow {
        &self.booking
    }

    pub fn insurance(&self) -> &InsurancePanel {
        &self.insurance
    }

    pub fn demo(&self) -> &DemoScreens {
        &self.demo
    }

    pub fn category_slots(&self) -> &CategorySlots {
        &self.slots
    }

    /// Options currently offered by the parent sub-specialty select.
    pub fn sub_specialty_options(&self) -> &[String] {
        &self.sub_specialties
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }
}

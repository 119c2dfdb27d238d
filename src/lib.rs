#![doc(test(attr(deny(warnings))))]

//! FlowMatch core: the wizard state machine, persisted session state and the
//! mocked matching, booking and insurance collaborators behind the FlowMatch
//! parent/therapist demo site.

pub mod app;
pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod insurance;
pub mod messages;
pub mod notify;
pub mod presenter;
pub mod scheduler;
pub mod storage;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FlowMatch tracing initialized.");
    });
}

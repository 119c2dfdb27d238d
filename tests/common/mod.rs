#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use flowmatch::{
    app::Session,
    config::{Config, ConfigManager},
    domain::FlowKind,
    presenter::{FixedAvailability, MockScheduler, TherapistDirectory},
    storage::{JsonFileStorage, StateStore},
    utils::paths,
    wizard::MemorySurface,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn store_in(base: &Path, config: &Config) -> StateStore {
    let storage =
        JsonFileStorage::new(paths::storage_dir_in(base)).expect("create json storage backend");
    StateStore::new(Box::new(storage), config.storage_slot.clone())
}

/// Opens a session persisted under `base`, with every calendar cell available.
pub fn open_session(base: &Path) -> Session {
    let config = Config::default();
    let store = store_in(base, &config);
    Session::open(config, store, MemorySurface::new()).with_scheduling_backend(Box::new(
        MockScheduler::new(
            Box::new(FixedAvailability::all_available()),
            TherapistDirectory::standard(),
        ),
    ))
}

/// Isolated session plus config manager backed by a fresh directory.
pub fn setup_test_env() -> (Session, ConfigManager, PathBuf) {
    let base = temp_base();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (open_session(&base), config_manager, base)
}

pub const PARENT_ANSWERS: [&[(&str, &str)]; 4] = [
    &[("child_name", "נועה"), ("child_age", "6"), ("city", "תל אביב")],
    &[("main_treatment", "speech")],
    &[("meeting_type", "קליניקה")],
    &[
        ("parent_name", "מיכל"),
        ("parent_phone", "050-0000000"),
        ("parent_email", "michal@example.com"),
    ],
];

pub fn fill_parent_step(session: &mut Session, step: usize) {
    for (field, value) in PARENT_ANSWERS[step - 1] {
        session
            .set_field(FlowKind::Parent, field, value)
            .expect("set parent field");
    }
}

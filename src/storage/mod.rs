//! Durable key-value slots and the application-state store built on them.

pub mod json_backend;
pub mod memory;

use tracing::{debug, info, warn};

use crate::domain::ApplicationState;
use crate::errors::StorageError;

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Default slot holding the serialized [`ApplicationState`].
pub const DEFAULT_SLOT: &str = "flowmatch_state";

/// Abstraction over per-user durable storage addressed by slot name.
pub trait KeyValueStorage {
    fn get(&self, slot: &str) -> Result<Option<String>>;
    fn set(&self, slot: &str, value: &str) -> Result<()>;
    fn remove(&self, slot: &str) -> Result<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        (**self).get(slot)
    }

    fn set(&self, slot: &str, value: &str) -> Result<()> {
        (**self).set(slot, value)
    }

    fn remove(&self, slot: &str) -> Result<()> {
        (**self).remove(slot)
    }
}

/// Saves and restores the whole session in one slot.
///
/// Neither direction ever fails: storage problems are logged and the session
/// carries on with whatever state it has in memory.
pub trait StatePersistence {
    fn save(&self, state: &ApplicationState);
    fn load(&self) -> ApplicationState;
}

pub struct StateStore {
    backend: Box<dyn KeyValueStorage>,
    slot: String,
}

impl StateStore {
    pub fn new(backend: Box<dyn KeyValueStorage>, slot: impl Into<String>) -> Self {
        Self {
            backend,
            slot: slot.into(),
        }
    }

    pub fn with_default_slot(backend: Box<dyn KeyValueStorage>) -> Self {
        Self::new(backend, DEFAULT_SLOT)
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Fallible save, for callers that want to surface the failure.
    pub fn try_save(&self, state: &ApplicationState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.backend.set(&self.slot, &json)
    }

    /// Fallible load. `Ok(None)` when the slot is empty.
    pub fn try_load(&self) -> Result<Option<ApplicationState>> {
        let Some(raw) = self.backend.get(&self.slot)? else {
            return Ok(None);
        };
        let mut state: ApplicationState = serde_json::from_str(&raw)?;
        state.normalize();
        Ok(Some(state))
    }

    /// Removes the persisted snapshot.
    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.slot) {
            warn!(slot = %self.slot, error = %err, "could not clear saved state");
        }
    }
}

impl StatePersistence for StateStore {
    fn save(&self, state: &ApplicationState) {
        match self.try_save(state) {
            Ok(()) => debug!(slot = %self.slot, "state saved"),
            Err(err) => warn!(slot = %self.slot, error = %err, "could not save state"),
        }
    }

    fn load(&self) -> ApplicationState {
        match self.try_load() {
            Ok(Some(state)) => {
                info!(slot = %self.slot, "state loaded from storage");
                state
            }
            Ok(None) => ApplicationState::default(),
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "could not load state; using defaults");
                ApplicationState::default()
            }
        }
    }
}

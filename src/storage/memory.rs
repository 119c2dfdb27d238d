use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::errors::StorageError;

use super::{KeyValueStorage, Result};

/// Volatile storage for tests and private sessions.
///
/// Can be switched to "unavailable" to simulate quota or privacy-mode failures.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.get() {
            Err(StorageError::Unavailable("memory storage disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.slots.borrow().get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &str) -> Result<()> {
        self.check()?;
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        self.check()?;
        self.slots.borrow_mut().remove(slot);
        Ok(())
    }
}

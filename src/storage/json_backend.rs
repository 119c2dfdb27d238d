use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::utils::paths::{self, ensure_dir, write_atomic};

use super::{KeyValueStorage, Result};

/// File-backed slots: each slot is `<root>/<slot>.json`, replaced atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// Storage below the application data directory.
    pub fn new_default() -> Result<Self> {
        Self::new(paths::storage_dir_in(&paths::app_data_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{}.json", canonical_slot(slot)))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, slot: &str, value: &str) -> Result<()> {
        let path = self.slot_path(slot);
        // Reformat so the file stays readable; fall back to the raw value otherwise.
        let pretty = serde_json::from_str::<serde_json::Value>(value)
            .and_then(|parsed| serde_json::to_string_pretty(&parsed))
            .unwrap_or_else(|_| value.to_string());
        write_atomic(&path, &pretty)?;
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn canonical_slot(slot: &str) -> String {
    let cleaned: String = slot
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "default".into()
    } else {
        cleaned
    }
}

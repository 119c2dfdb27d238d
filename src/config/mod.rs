use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::errors::ConfigError;
use crate::storage::DEFAULT_SLOT;
use crate::utils::paths::{self, ensure_dir, write_atomic};

/// Tunables for the session. Every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub storage_slot: String,
    pub toast_lifetime_ms: u64,
    pub results_reveal_delay_ms: u64,
    pub analysis_delay_ms: u64,
    pub booking_notice_delay_ms: u64,
    /// Probability that a calendar cell is available.
    pub availability_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_seed: Option<u64>,
    pub max_upload_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "he-IL".into(),
            storage_slot: DEFAULT_SLOT.into(),
            toast_lifetime_ms: 3000,
            results_reveal_delay_ms: 300,
            analysis_delay_ms: 2500,
            booking_notice_delay_ms: 2000,
            availability_ratio: 0.6,
            availability_seed: None,
            max_upload_bytes: crate::domain::MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn toast_lifetime(&self) -> Duration {
        Duration::from_millis(self.toast_lifetime_ms)
    }

    pub fn results_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.results_reveal_delay_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn booking_notice_delay(&self) -> Duration {
        Duration::from_millis(self.booking_notice_delay_ms)
    }

    /// Sets a single key from its textual form, as used by `config set`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        let parse_ms = |raw: &str| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| invalid("expected milliseconds"))
        };
        match key {
            "locale" => self.locale = value.trim().to_string(),
            "storage_slot" => {
                if value.trim().is_empty() {
                    return Err(invalid("slot name cannot be empty"));
                }
                self.storage_slot = value.trim().to_string();
            }
            "toast_lifetime_ms" => self.toast_lifetime_ms = parse_ms(value)?,
            "results_reveal_delay_ms" => self.results_reveal_delay_ms = parse_ms(value)?,
            "analysis_delay_ms" => self.analysis_delay_ms = parse_ms(value)?,
            "booking_notice_delay_ms" => self.booking_notice_delay_ms = parse_ms(value)?,
            "availability_ratio" => {
                let ratio = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid("expected a number"))?;
                if !(0.0..=1.0).contains(&ratio) {
                    return Err(invalid("must be between 0 and 1"));
                }
                self.availability_ratio = ratio;
            }
            "availability_seed" => {
                let trimmed = value.trim();
                self.availability_seed = if trimmed.is_empty() || trimmed == "none" {
                    None
                } else {
                    Some(trimmed.parse().map_err(|_| invalid("expected an integer"))?)
                };
            }
            "max_upload_bytes" => {
                self.max_upload_bytes = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected a byte count"))?
            }
            _ => return Err(invalid("unknown key")),
        }
        Ok(())
    }
}

/// Loads and saves `config.json` in the application data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

//! Configuration and the data directory.
//!
//! The config lives next to the overlays, in the same key-value store, under
//! the `config` key (`config.json` for [`FsBackend`]).

use crate::error::{ClinicError, Result};
use crate::store::fs::FsBackend;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_KEY: &str = "config";
const DEFAULT_LOG_LEVEL: &str = "warn";
pub const HOME_ENV: &str = "CLINIC_HOME";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicConfig {
    /// Pretty-print persisted overlays
    #[serde(default)]
    pub pretty_json: bool,

    /// Default tracing filter (e.g. "warn", "debug", "clinic_overlay=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            pretty_json: false,
            log_level: default_log_level(),
        }
    }
}

impl ClinicConfig {
    /// Defaults when nothing has been saved yet.
    pub fn load(store: &impl KeyValueStore) -> Result<Self> {
        match store.get(CONFIG_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<()> {
        store.set(CONFIG_KEY, &serde_json::to_string_pretty(self)?)
    }
}

/// The resolved data directory and the config found in it.
#[derive(Debug, Clone)]
pub struct ClinicHome {
    pub dir: PathBuf,
    pub config: ClinicConfig,
}

impl ClinicHome {
    /// `$CLINIC_HOME` if set, otherwise the platform data directory. An
    /// unreadable config falls back to defaults.
    pub fn resolve() -> Result<Self> {
        let dir = match std::env::var_os(HOME_ENV) {
            Some(home) => PathBuf::from(home),
            None => directories::ProjectDirs::from("com", "clinic", "clinic")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    ClinicError::Store("Could not determine data directory".to_string())
                })?,
        };
        Ok(Self::at(dir))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let config = ClinicConfig::load(&FsBackend::new(&dir)).unwrap_or_default();
        Self { dir, config }
    }

    pub fn backend(&self) -> FsBackend {
        FsBackend::new(&self.dir)
    }
}

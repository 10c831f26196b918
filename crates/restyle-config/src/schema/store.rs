//! Theme store location.

use std::path::PathBuf;
use std::time::Duration;

use restyle_common::ConfigError;
use serde::{Deserialize, Serialize};

use crate::toml_loader::config_dir;

/// File name of the JSON store inside the config directory.
pub const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store file. Defaults to `store.json` next to the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Quiet period after an external edit before the store reloads.
    pub watch_debounce_ms: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            watch_debounce_ms: 500,
        }
    }
}

impl StoreConfig {
    pub fn watch_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.watch_debounce_ms))
    }

    /// The configured path, or the platform default.
    pub fn resolve_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join(STORE_FILE_NAME)),
        }
    }
}

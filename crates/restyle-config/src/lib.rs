//! Restyle configuration and persistence.
//!
//! Provides the TOML app config (with defaults for every section, so partial
//! files work), its validation, and the JSON file store that backs theme
//! state outside a browser, including its change watcher.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use restyle_config::{load_config, FileStore};
//!
//! let config = load_config().expect("failed to load config");
//! let store = FileStore::open(config.store.resolve_path().unwrap()).unwrap();
//! ```

pub mod schema;
pub mod store;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use schema::{LogLevel, RestyleConfig, StoreConfig, SyncConfig, WindowConfig, CONFIG_SCHEMA_VERSION};
pub use store::{seed_defaults, FileStore};
pub use watcher::FileWatcher;

use restyle_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<RestyleConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from `path` if given, otherwise from the default path.
pub fn load_config_from(path: Option<&Path>) -> Result<RestyleConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            Ok(config)
        }
        None => load_config(),
    }
}

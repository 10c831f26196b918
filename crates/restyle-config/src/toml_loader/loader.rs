//! Core TOML config loading: read from path or platform default.

use crate::schema::RestyleConfig;
use crate::validation;
use restyle_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields use serde defaults. Validation problems are logged and the
/// parsed config is returned as-is; callers that need a valid config run
/// [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<RestyleConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: RestyleConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/restyle/restyle.toml`
/// On Linux: `~/.config/restyle/restyle.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<RestyleConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(RestyleConfig::default())
        }
        Err(e) => Err(e),
    }
}

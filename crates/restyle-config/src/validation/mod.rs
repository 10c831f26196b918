//! Full configuration validation.
//!
//! Checks every numeric range and collects all errors into a single
//! `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::RestyleConfig;
use helpers::validate_range;
use restyle_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RestyleConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_sync(&mut errors, config);
    validate_store(&mut errors, config);
    validate_window(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_sync(errors: &mut Vec<String>, config: &RestyleConfig) {
    let sync = &config.sync;
    validate_range(errors, "sync.startup_delay_ms", sync.startup_delay_ms, 0, 10_000);
    validate_range(errors, "sync.insert_retry_ms", sync.insert_retry_ms, 10, 5_000);
    validate_range(errors, "sync.reapply_delay_ms", sync.reapply_delay_ms, 10, 5_000);
}

fn validate_store(errors: &mut Vec<String>, config: &RestyleConfig) {
    let store = &config.store;
    validate_range(errors, "store.watch_debounce_ms", store.watch_debounce_ms, 10, 10_000);
}

fn validate_window(errors: &mut Vec<String>, config: &RestyleConfig) {
    let window = &config.window;
    validate_range(errors, "window.width", window.width, 320, 7_680);
    validate_range(errors, "window.height", window.height, 240, 4_320);
    if window.title.trim().is_empty() {
        errors.push("window.title must not be empty".into());
    }
}

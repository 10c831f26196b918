//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    assert!(validate(&RestyleConfig::default()).is_ok());
}

#[test]
fn catches_insert_retry_too_small() {
    let mut config = RestyleConfig::default();
    config.sync.insert_retry_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("sync.insert_retry_ms"));
}

#[test]
fn catches_startup_delay_too_large() {
    let mut config = RestyleConfig::default();
    config.sync.startup_delay_ms = 60_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("sync.startup_delay_ms"));
}

#[test]
fn zero_startup_delay_is_allowed() {
    let mut config = RestyleConfig::default();
    config.sync.startup_delay_ms = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_window_too_small() {
    let mut config = RestyleConfig::default();
    config.window.width = 100;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
}

#[test]
fn catches_empty_title() {
    let mut config = RestyleConfig::default();
    config.window.title = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.title"));
}

#[test]
fn catches_zero_watch_debounce() {
    let mut config = RestyleConfig::default();
    config.store.watch_debounce_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("store.watch_debounce_ms"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = RestyleConfig::default();
    config.sync.reapply_delay_ms = 1;
    config.window.height = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("sync.reapply_delay_ms"));
    assert!(err.contains("window.height"));
    assert!(err.contains("; "));
}

//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::{LogLevel, RestyleConfig};
use restyle_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_restyle_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restyle.toml");
    std::fs::write(
        &path,
        r#"
[sync]
startup_delay_ms = 50

[logging]
level = "WARNING"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.sync.startup_delay_ms, 50);
    assert_eq!(config.logging.level, LogLevel::Warning);
    // Defaults preserved
    assert_eq!(config.sync.insert_retry_ms, 100);
    assert_eq!(config.window.width, 1280);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restyle.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn out_of_range_values_are_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restyle.toml");
    std::fs::write(&path, "[window]\nheight = 1\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.height, 1);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restyle").join("restyle.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config, RestyleConfig::default());
}

#[test]
fn default_template_parses_to_defaults() {
    let config: RestyleConfig = toml::from_str(template::default_config_toml()).unwrap();
    assert_eq!(config, RestyleConfig::default());
}

#[test]
fn default_config_path_ends_with_file_name() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("restyle/restyle.toml"));
    }
}

//! Persisted-state keys shared by the store, the controller and the CLI.

/// Mapping of theme id to theme record.
pub const THEMES: &str = "themes";
/// Id of the selected theme.
pub const CURRENT_THEME_ID: &str = "currentThemeId";
/// Global on/off switch.
pub const IS_ENABLED: &str = "isEnabled";
/// Opaque change marker; any write is a re-apply trigger.
pub const LAST_APPLIED: &str = "lastApplied";

/// Keys the controller reads on every evaluation.
pub const STATE_KEYS: &[&str] = &[THEMES, CURRENT_THEME_ID, IS_ENABLED];

//! Preview window configuration types.

use serde::{Deserialize, Serialize};

/// Size and title of the `browse` preview window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width in logical pixels (valid range: 320-7680).
    pub width: u32,
    /// Initial height in logical pixels (valid range: 240-4320).
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            title: "restyle".into(),
        }
    }
}

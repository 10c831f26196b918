//! Configuration schema types for restyle.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod store;
mod sync;
mod window;

pub use logging::*;
pub use store::*;
pub use sync::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestyleConfig {
    pub sync: SyncConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub window: WindowConfig,
}

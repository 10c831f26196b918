//! Live sync timing configuration.

use std::time::Duration;

use restyle_sync::SyncTimings;
use serde::{Deserialize, Serialize};

/// Controller delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Wait before the controller starts listening (valid range: 0-10000).
    pub startup_delay_ms: u32,
    /// Wait before the single style insertion retry (valid range: 10-5000).
    pub insert_retry_ms: u32,
    /// Wait before re-applying a style node the page removed (valid range: 10-5000).
    pub reapply_delay_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: 500,
            insert_retry_ms: 100,
            reapply_delay_ms: 100,
        }
    }
}

impl From<&SyncConfig> for SyncTimings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            startup_delay: Duration::from_millis(config.startup_delay_ms.into()),
            insert_retry: Duration::from_millis(config.insert_retry_ms.into()),
            reapply_delay: Duration::from_millis(config.reapply_delay_ms.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_default_timings() {
        assert_eq!(SyncTimings::from(&SyncConfig::default()), SyncTimings::default());
    }
}

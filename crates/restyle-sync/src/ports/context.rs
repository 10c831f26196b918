use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use restyle_common::SyncError;

/// Validity handle for the hosting context.
///
/// Clones share one flag. Once invalidated (page torn down, extension
/// reloaded) every in-flight controller operation aborts quietly.
#[derive(Debug, Clone)]
pub struct ExtensionContext {
    valid: Arc<AtomicBool>,
}

impl Default for ExtensionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionContext {
    pub fn new() -> Self {
        Self {
            valid: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    pub fn check(&self) -> Result<(), SyncError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SyncError::ContextInvalidated)
        }
    }
}

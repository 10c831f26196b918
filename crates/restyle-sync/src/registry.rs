//! One controller per page.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use restyle_common::SyncError;
use tracing::debug;

/// Tracks which pages already have a live controller.
///
/// Claiming a page that is already claimed fails, which makes controller
/// construction idempotent-safe: a second initialization in the same page is
/// refused instead of injecting a second stylesheet.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, page_id: &str) -> Result<PageClaim, SyncError> {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !claimed.insert(page_id.to_string()) {
            return Err(SyncError::AlreadyInitialized(page_id.to_string()));
        }
        debug!(page = page_id, "claimed page");
        Ok(PageClaim {
            page_id: page_id.to_string(),
            registry: self.clone(),
        })
    }

    pub fn is_claimed(&self, page_id: &str) -> bool {
        self.claimed
            .lock()
            .map(|claimed| claimed.contains(page_id))
            .unwrap_or(false)
    }
}

/// Releases its page when dropped.
#[derive(Debug)]
pub struct PageClaim {
    page_id: String,
    registry: PageRegistry,
}

impl PageClaim {
    pub fn page_id(&self) -> &str {
        &self.page_id
    }
}

impl Drop for PageClaim {
    fn drop(&mut self) {
        if let Ok(mut claimed) = self.registry.claimed.lock() {
            claimed.remove(&self.page_id);
        }
    }
}

//! In-memory port implementations for tests and headless runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use restyle_common::StoreError;
use restyle_inject::{DomError, MemoryDocument, NodeId, StyleHost, StyleNode};
use tokio::sync::broadcast;

use crate::page::Page;
use crate::ports::{diff_entries, Entries, KeyValueStore, StorageChange};

const CHANGE_CAPACITY: usize = 64;

// =============================================================================
// STORE
// =============================================================================

/// A shared in-memory [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<Entries>>,
    changes: broadcast::Sender<Vec<StorageChange>>,
    failing: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_entries(Entries::new())
    }

    pub fn with_entries(entries: Entries) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            entries: Arc::new(Mutex::new(entries)),
            changes,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A copy of every stored entry.
    pub fn snapshot(&self) -> Entries {
        self.lock().clone()
    }

    /// Make every subsequent read and write fail, as a broken backend would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Entries, StoreError> {
        self.check()?;
        let entries = self.lock();
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, update: Entries) -> Result<(), StoreError> {
        self.check()?;
        let changes = {
            let mut entries = self.lock();
            let before = entries.clone();
            entries.extend(update);
            diff_entries(&before, &entries)
        };
        if !changes.is_empty() {
            // No subscribers is fine.
            let _ = self.changes.send(changes);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Vec<StorageChange>> {
        self.changes.subscribe()
    }
}

// =============================================================================
// PAGE
// =============================================================================

#[derive(Debug)]
struct PageInfo {
    url: String,
    ready: bool,
}

/// A [`Page`] over a [`MemoryDocument`] with a settable URL and load state.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    document: MemoryDocument,
    info: Arc<Mutex<PageInfo>>,
}

impl MemoryPage {
    /// A loaded page at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            document: MemoryDocument::new(),
            info: Arc::new(Mutex::new(PageInfo {
                url: url.into(),
                ready: true,
            })),
        }
    }

    /// A page still parsing: not ready and without a style root.
    pub fn loading(url: impl Into<String>) -> Self {
        let page = Self::new(url);
        page.set_ready(false);
        page.document.set_root_available(false);
        page
    }

    fn info(&self) -> MutexGuard<'_, PageInfo> {
        self.info.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.document
    }

    pub fn set_url(&self, url: impl Into<String>) {
        self.info().url = url.into();
    }

    pub fn set_ready(&self, ready: bool) {
        self.info().ready = ready;
    }
}

impl StyleHost for MemoryPage {
    fn has_style_root(&self) -> bool {
        self.document.has_style_root()
    }

    fn insert_style(&self, node: StyleNode) -> Result<NodeId, DomError> {
        self.document.insert_style(node)
    }

    fn remove_node(&self, id: NodeId) -> bool {
        self.document.remove_node(id)
    }

    fn find_marked(&self, attribute: &str) -> Vec<NodeId> {
        self.document.find_marked(attribute)
    }

    fn contains(&self, id: NodeId) -> bool {
        self.document.contains(id)
    }
}

impl Page for MemoryPage {
    fn url(&self) -> String {
        self.info().url.clone()
    }

    fn is_document_ready(&self) -> bool {
        self.info().ready
    }
}

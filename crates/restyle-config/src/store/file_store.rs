//! JSON file backed [`KeyValueStore`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use restyle_common::StoreError;
use restyle_sync::{diff_entries, Entries, KeyValueStore, StorageChange};
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::watcher::FileWatcher;

const CHANGE_CAPACITY: usize = 64;

struct Inner {
    path: PathBuf,
    /// Last contents announced to subscribers.
    known: Mutex<Entries>,
    changes: broadcast::Sender<Vec<StorageChange>>,
}

/// All persisted keys in one JSON object file.
///
/// Writes go through a temp file and a rename, so readers (including other
/// processes) never see a half-written file. Edits made by other processes
/// are picked up by [`FileStore::watch`].
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<Inner>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = read_entries(&path)?;
        debug!(path = %path.display(), keys = entries.len(), "opened store");

        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Ok(Self {
            inner: Arc::new(Inner {
                path,
                known: Mutex::new(entries),
                changes,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Re-read the file and announce whatever changed since the last look.
    pub async fn refresh(&self) -> Result<Vec<StorageChange>, StoreError> {
        let mut known = self.inner.known.lock().await;
        let current = read_entries(&self.inner.path)?;
        let changes = diff_entries(&known, &current);
        *known = current;
        drop(known);

        self.announce(&changes);
        Ok(changes)
    }

    /// Watch the file for external edits in a background task, reloading
    /// after each burst of edits has been quiet for `debounce`.
    ///
    /// The task stops when the store (and every clone) is dropped.
    pub fn watch(&self, debounce: Duration) -> JoinHandle<()> {
        let watcher = FileWatcher::new(self.inner.path.clone()).with_debounce(debounce);
        let (signal_tx, mut signal_rx) = broadcast::channel::<()>(16);
        let store = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            if let Err(e) = watcher.watch(signal_tx).await {
                error!("store watcher error: {e}");
            }
        });

        tokio::spawn(async move {
            loop {
                match signal_rx.recv().await {
                    Ok(()) => {
                        let Some(inner) = store.upgrade() else {
                            break;
                        };
                        let store = FileStore { inner };
                        match store.refresh().await {
                            Ok(changes) if !changes.is_empty() => {
                                info!(count = changes.len(), "store changed on disk");
                            }
                            Ok(_) => {}
                            Err(e) => warn!("failed to reload store: {e}"),
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("store watcher lagged by {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("store watcher channel closed");
                        break;
                    }
                }
            }
        })
    }

    fn announce(&self, changes: &[StorageChange]) {
        if changes.is_empty() {
            return;
        }
        if self.inner.changes.send(changes.to_vec()).is_err() {
            debug!("no subscribers for store changes");
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, keys: &[&str]) -> Result<Entries, StoreError> {
        let entries = read_entries(&self.inner.path)?;
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, update: Entries) -> Result<(), StoreError> {
        let mut known = self.inner.known.lock().await;

        let mut next = read_entries(&self.inner.path)?;
        next.extend(update);
        write_entries(&self.inner.path, &next)?;

        let changes = diff_entries(&known, &next);
        *known = next;
        drop(known);

        self.announce(&changes);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Vec<StorageChange>> {
        self.inner.changes.subscribe()
    }
}

// =============================================================================
// FILE I/O
// =============================================================================

fn read_entries(path: &Path) -> Result<Entries, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(Entries::new());
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(entries)) => Ok(entries),
        Ok(_) => Err(StoreError::Parse(format!(
            "{} does not hold a JSON object",
            path.display()
        ))),
        Err(e) => Err(StoreError::Parse(format!(
            "failed to parse {}: {e}",
            path.display()
        ))),
    }
}

fn write_entries(path: &Path, entries: &Entries) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| StoreError::Parse(format!("failed to serialize store: {e}")))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

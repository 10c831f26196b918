use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use restyle_common::ConfigError;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// Quiet period that ends a burst of file events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Watches one file and sends `()` after each debounced burst of changes.
pub struct FileWatcher {
    path: PathBuf,
    debounce: Duration,
}

impl FileWatcher {
    /// Create a watcher for `path`. The file need not exist yet.
    pub fn new(path: PathBuf) -> Self {
        if !path.exists() {
            warn!("{} does not exist yet, will watch for creation", path.display());
        }
        Self {
            path,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Use `debounce` as the quiet period instead of [`DEFAULT_DEBOUNCE`].
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Watch until every receiver is gone or the notify backend stops.
    pub async fn watch(&self, tx: broadcast::Sender<()>) -> Result<(), ConfigError> {
        let watch_dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();

        info!("watching {}", self.path.display());

        // Bridge the sync notify callback into async.
        let (notify_tx, mut notify_rx) = mpsc::channel::<()>(16);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if is_relevant(&event, &file_name) {
                        debug!(kind = ?event.kind, "watched file event");
                        let _ = notify_tx.try_send(());
                    }
                }
                Err(e) => error!("file watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                ConfigError::WatchError(format!("failed to watch {}: {e}", watch_dir.display()))
            })?;

        loop {
            if notify_rx.recv().await.is_none() {
                break;
            }

            // Each further event inside the window restarts it.
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.debounce) => break,
                    msg = notify_rx.recv() => {
                        if msg.is_none() {
                            return Ok(());
                        }
                    }
                }
            }

            debug!("{} changed", self.path.display());
            if tx.send(()).is_err() {
                info!("no listeners left for {}, stopping watcher", self.path.display());
                break;
            }
        }

        Ok(())
    }
}

/// Create, modify and rename-into events that touch `file_name`.
pub(super) fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    let kind_matches = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
    kind_matches
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == file_name.as_os_str()))
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("store parse error: {0}")]
    Parse(String),

    #[error("store closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Nobody is listening on the other end (no controller in that page).
    #[error("no receiver for message")]
    NoReceiver,

    /// The receiver took the message but dropped the reply channel.
    #[error("reply dropped before a response was sent")]
    Dropped,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("extension context invalidated")]
    ContextInvalidated,

    #[error("controller already initialized for page {0}")]
    AlreadyInitialized(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("theme not found: {0}")]
    NotFound(String),

    #[error("cannot remove the last remaining theme")]
    LastTheme,

    #[error("theme import error: {0}")]
    Import(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RestyleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}

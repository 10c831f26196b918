pub mod errors;
pub mod id;
pub mod keys;
pub mod types;

pub use errors::{
    CollectionError, ConfigError, MessagingError, RestyleError, StoreError, SyncError,
};
pub use id::{new_id, ThemeId};
pub use types::{Theme, ThemeBundle, ThemeCollection, BUNDLE_VERSION};

pub type Result<T> = std::result::Result<T, RestyleError>;

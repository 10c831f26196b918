//! Persistent key-value state backed by a JSON file.

mod file_store;
mod seed;

pub use file_store::FileStore;
pub use seed::seed_defaults;

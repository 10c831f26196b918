//! Debounced single-file watcher.
//!
//! Uses the `notify` crate to watch one file's directory, filtering events
//! down to that file and coalescing bursts (editors and atomic writes emit
//! several events per save).

mod file_watcher;

#[cfg(test)]
mod tests;

pub use file_watcher::{FileWatcher, DEFAULT_DEBOUNCE};

//! Tests for the file watcher.

use super::*;
use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn default_debounce_is_half_a_second() {
    let watcher = FileWatcher::new(PathBuf::from("/tmp/restyle_store.json"));
    assert_eq!(watcher.debounce(), DEFAULT_DEBOUNCE);
    assert_eq!(DEFAULT_DEBOUNCE.as_millis(), 500);
}

#[test]
fn debounce_can_be_configured() {
    let watcher = FileWatcher::new(PathBuf::from("/tmp/restyle_store.json"))
        .with_debounce(Duration::from_millis(50));
    assert_eq!(watcher.debounce(), Duration::from_millis(50));
}

#[test]
fn watcher_new_with_nonexistent_path_succeeds() {
    let watcher = FileWatcher::new(PathBuf::from("/tmp/nonexistent_restyle_store.json"));
    assert_eq!(watcher.path(), &PathBuf::from("/tmp/nonexistent_restyle_store.json"));
}

#[test]
fn only_changes_to_the_watched_file_are_relevant() {
    let name = std::ffi::OsString::from("store.json");
    let event = |kind, path: &str| Event::new(kind).add_path(PathBuf::from(path));

    assert!(file_watcher::is_relevant(
        &event(EventKind::Modify(ModifyKind::Any), "/x/store.json"),
        &name
    ));
    assert!(file_watcher::is_relevant(
        &event(EventKind::Create(CreateKind::File), "/x/store.json"),
        &name
    ));
    assert!(!file_watcher::is_relevant(
        &event(EventKind::Modify(ModifyKind::Any), "/x/other.json"),
        &name
    ));
    assert!(!file_watcher::is_relevant(
        &event(EventKind::Remove(RemoveKind::File), "/x/store.json"),
        &name
    ));
}

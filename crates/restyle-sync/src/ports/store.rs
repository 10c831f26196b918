//! Key-value persistence port.

use async_trait::async_trait;
use restyle_common::StoreError;
use serde_json::Value;
use tokio::sync::broadcast;

/// A set of stored keys and their JSON values.
pub type Entries = serde_json::Map<String, Value>;

/// One key's change, as announced to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// Shared persisted state, readable from every page context.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read `keys`. Absent keys are simply missing from the result.
    async fn get(&self, keys: &[&str]) -> Result<Entries, StoreError>;

    /// Write every entry, announcing the keys whose value actually changed.
    async fn set(&self, entries: Entries) -> Result<(), StoreError>;

    /// Receive batches of changes made after this call.
    fn subscribe(&self) -> broadcast::Receiver<Vec<StorageChange>>;
}

/// Per-key differences between two snapshots, in key order.
pub fn diff_entries(old: &Entries, new: &Entries) -> Vec<StorageChange> {
    let mut keys: Vec<&String> = old.keys().chain(new.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter_map(|key| {
            let before = old.get(key);
            let after = new.get(key);
            (before != after).then(|| StorageChange {
                key: key.clone(),
                old_value: before.cloned(),
                new_value: after.cloned(),
            })
        })
        .collect()
}

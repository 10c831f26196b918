//! First-run defaults for the persisted state.

use restyle_common::keys::{CURRENT_THEME_ID, IS_ENABLED, STATE_KEYS, THEMES};
use restyle_common::{StoreError, Theme, ThemeCollection};
use restyle_sync::{Entries, KeyValueStore};
use serde_json::{json, Value};
use tracing::info;

/// Fill in missing state keys so at least one theme exists and one is
/// selected. Keys that already hold a value are left alone.
///
/// Returns `true` if anything was written.
pub async fn seed_defaults(store: &dyn KeyValueStore) -> Result<bool, StoreError> {
    let current = store.get(STATE_KEYS).await?;
    let mut update = Entries::new();

    let mut themes = current
        .get(THEMES)
        .map(ThemeCollection::from_value)
        .unwrap_or_default();

    if themes.is_empty() {
        let starter = Theme::starter();
        info!(theme = %starter.id, "seeding starter theme");
        update.insert(CURRENT_THEME_ID.into(), json!(starter.id.as_str()));
        themes.insert(starter);
        update.insert(THEMES.into(), themes.to_value());
    } else if selection_missing(current.get(CURRENT_THEME_ID), &themes) {
        if let Some(first) = themes.first_id() {
            info!(theme = %first, "selecting first theme");
            update.insert(CURRENT_THEME_ID.into(), json!(first.as_str()));
        }
    }

    if !current.contains_key(IS_ENABLED) {
        update.insert(IS_ENABLED.into(), json!(true));
    }

    if update.is_empty() {
        return Ok(false);
    }
    store.set(update).await?;
    Ok(true)
}

fn selection_missing(selected: Option<&Value>, themes: &ThemeCollection) -> bool {
    match selected.and_then(Value::as_str) {
        Some(id) => !themes.contains(id),
        None => true,
    }
}

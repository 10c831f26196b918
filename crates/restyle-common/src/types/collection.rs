use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::CollectionError;
use crate::id::ThemeId;

use super::theme::Theme;

/// The persisted `themes` mapping of theme id to theme record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeCollection {
    themes: BTreeMap<ThemeId, Theme>,
}

impl ThemeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored `themes` value, skipping records that fail to parse.
    ///
    /// A single bad record must not hide every other theme from the page,
    /// so this never fails; a non-object value yields an empty collection.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let mut collection = Self::new();
        let Some(map) = value.as_object() else {
            warn!("themes value is not an object, treating as empty");
            return collection;
        };

        for (key, raw) in map {
            match serde_json::from_value::<Theme>(raw.clone()) {
                Ok(theme) => {
                    collection.themes.insert(ThemeId::from(key.as_str()), theme);
                }
                Err(e) => {
                    warn!(id = %key, error = %e, "skipping malformed theme record");
                }
            }
        }
        collection
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Theme> {
        self.themes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    pub fn insert(&mut self, theme: Theme) -> Option<Theme> {
        self.themes.insert(theme.id.clone(), theme)
    }

    /// Remove a theme. At least one theme must always remain.
    pub fn remove(&mut self, id: &str) -> Result<Theme, CollectionError> {
        if !self.themes.contains_key(id) {
            return Err(CollectionError::NotFound(id.to_string()));
        }
        if self.themes.len() == 1 {
            return Err(CollectionError::LastTheme);
        }
        self.themes
            .remove(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))
    }

    /// Add imported themes. Colliding ids get a fresh id rather than
    /// overwriting the existing record. Returns how many were added.
    pub fn merge(&mut self, incoming: Vec<Theme>) -> usize {
        let mut added = 0;
        for mut theme in incoming {
            if self.themes.contains_key(theme.id.as_str()) {
                theme.id = ThemeId::new();
            }
            self.insert(theme);
            added += 1;
        }
        added
    }

    /// Themes ordered by creation time, oldest first.
    pub fn sorted(&self) -> Vec<&Theme> {
        let mut themes: Vec<&Theme> = self.themes.values().collect();
        themes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        themes
    }

    pub fn first_id(&self) -> Option<&ThemeId> {
        self.sorted().first().map(|t| &t.id)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.values()
    }
}

//! Pure decision logic: given persisted state and a page URL, what should
//! the page look like?

use restyle_common::keys::{CURRENT_THEME_ID, IS_ENABLED, THEMES};
use restyle_common::{Theme, ThemeCollection, ThemeId};
use restyle_css::{matches, transform};
use serde_json::Value;

use crate::ports::Entries;

/// The persisted keys the controller reacts to, decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub enabled: bool,
    pub current_theme_id: Option<ThemeId>,
    pub themes: ThemeCollection,
}

impl PersistedState {
    /// Decode stored entries. Absent or mistyped keys read as "nothing to apply".
    pub fn from_entries(entries: &Entries) -> Self {
        Self {
            enabled: entries
                .get(IS_ENABLED)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            current_theme_id: entries
                .get(CURRENT_THEME_ID)
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(ThemeId::from),
            themes: entries
                .get(THEMES)
                .map(ThemeCollection::from_value)
                .unwrap_or_default(),
        }
    }

    /// The selected theme, if it exists in the collection.
    pub fn current_theme(&self) -> Option<&Theme> {
        self.current_theme_id
            .as_ref()
            .and_then(|id| self.themes.get(id.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveReason {
    Disabled,
    NoTheme,
    UrlMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Inject `css`, the transformed source of `theme_id`.
    Apply { theme_id: ThemeId, css: String },
    Remove(RemoveReason),
}

/// Decide what `page_url` should show for `state`.
pub fn resolve(state: &PersistedState, page_url: &str) -> Verdict {
    if !state.enabled {
        return Verdict::Remove(RemoveReason::Disabled);
    }
    let Some(theme) = state.current_theme() else {
        return Verdict::Remove(RemoveReason::NoTheme);
    };
    if !matches(page_url, &theme.website_url) {
        return Verdict::Remove(RemoveReason::UrlMismatch);
    }
    Verdict::Apply {
        theme_id: theme.id.clone(),
        css: transform(&theme.css),
    }
}

/// Gate for CSS pushed directly by the UI, which is already transformed.
///
/// Only the enabled flag and the selected theme's pattern are checked; with
/// no theme selected the pushed CSS is allowed through.
pub fn admit_pushed(state: &PersistedState, page_url: &str) -> Result<(), RemoveReason> {
    if !state.enabled {
        return Err(RemoveReason::Disabled);
    }
    match state.current_theme() {
        Some(theme) if !matches(page_url, &theme.website_url) => Err(RemoveReason::UrlMismatch),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(enabled: Option<bool>, pattern: &str) -> PersistedState {
        let mut theme = Theme::new("T", pattern, "--a: 1;\np { margin: 0 }");
        theme.id = ThemeId::from("t1");
        let mut entries = Entries::new();
        entries.insert(THEMES.into(), json!({ "t1": theme }));
        entries.insert(CURRENT_THEME_ID.into(), json!("t1"));
        if let Some(enabled) = enabled {
            entries.insert(IS_ENABLED.into(), json!(enabled));
        }
        PersistedState::from_entries(&entries)
    }

    #[test]
    fn disabled_always_removes() {
        let s = state(Some(false), "");
        assert_eq!(resolve(&s, "https://a.test/"), Verdict::Remove(RemoveReason::Disabled));
        assert_eq!(admit_pushed(&s, "https://a.test/"), Err(RemoveReason::Disabled));
    }

    #[test]
    fn absent_enabled_flag_reads_as_disabled() {
        let s = state(None, "");
        assert!(!s.enabled);
        assert_eq!(resolve(&s, "https://a.test/"), Verdict::Remove(RemoveReason::Disabled));
    }

    #[test]
    fn matching_theme_is_transformed() {
        let s = state(Some(true), "a.test");
        match resolve(&s, "https://www.a.test/x") {
            Verdict::Apply { theme_id, css } => {
                assert_eq!(theme_id.as_str(), "t1");
                assert_eq!(css, transform("--a: 1;\np { margin: 0 }"));
            }
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn mismatched_url_removes() {
        let s = state(Some(true), "b.test");
        assert_eq!(resolve(&s, "https://a.test/"), Verdict::Remove(RemoveReason::UrlMismatch));
        assert_eq!(admit_pushed(&s, "https://a.test/"), Err(RemoveReason::UrlMismatch));
    }

    #[test]
    fn missing_selected_theme_removes() {
        let mut s = state(Some(true), "");
        s.current_theme_id = Some(ThemeId::from("gone"));
        assert_eq!(resolve(&s, "https://a.test/"), Verdict::Remove(RemoveReason::NoTheme));
        assert_eq!(admit_pushed(&s, "https://a.test/"), Ok(()));
    }

    #[test]
    fn empty_entries_decode_to_nothing() {
        let s = PersistedState::from_entries(&Entries::new());
        assert_eq!(s, PersistedState::default());
        assert_eq!(s.current_theme(), None);
    }

    #[test]
    fn mistyped_values_are_ignored() {
        let mut entries = Entries::new();
        entries.insert(IS_ENABLED.into(), json!("yes"));
        entries.insert(CURRENT_THEME_ID.into(), json!(7));
        entries.insert(THEMES.into(), json!([1, 2]));
        let s = PersistedState::from_entries(&entries);
        assert!(!s.enabled);
        assert!(s.current_theme_id.is_none());
        assert!(s.themes.is_empty());
    }
}

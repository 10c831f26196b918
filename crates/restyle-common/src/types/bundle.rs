use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CollectionError;

use super::theme::Theme;

/// Current export format version.
pub const BUNDLE_VERSION: u32 = 1;

/// Export document for sharing themes between installs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeBundle {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub themes: Vec<Theme>,
}

/// Accepted import shapes, most specific first.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportShape {
    Bundle(ThemeBundle),
    List(Vec<Theme>),
    Single(Theme),
}

impl ThemeBundle {
    pub fn new(themes: Vec<Theme>) -> Self {
        Self {
            version: BUNDLE_VERSION,
            exported_at: Utc::now(),
            themes,
        }
    }

    pub fn to_json(&self) -> Result<String, CollectionError> {
        serde_json::to_string_pretty(self).map_err(|e| CollectionError::Import(e.to_string()))
    }

    /// Parse an import file: a bundle, a bare array of themes, or one theme.
    pub fn parse(raw: &str) -> Result<Vec<Theme>, CollectionError> {
        let shape: ImportShape = serde_json::from_str(raw)
            .map_err(|e| CollectionError::Import(format!("unrecognised theme file: {e}")))?;

        let themes = match shape {
            ImportShape::Bundle(bundle) => {
                if bundle.version > BUNDLE_VERSION {
                    return Err(CollectionError::Import(format!(
                        "bundle version {} is newer than supported version {BUNDLE_VERSION}",
                        bundle.version
                    )));
                }
                bundle.themes
            }
            ImportShape::List(themes) => themes,
            ImportShape::Single(theme) => vec![theme],
        };

        if themes.is_empty() {
            return Err(CollectionError::Import("file contains no themes".into()));
        }
        Ok(themes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_then_parse_keeps_themes() {
        let bundle = ThemeBundle::new(vec![Theme::new("A", "example.com", "a { color: red }")]);
        let json = bundle.to_json().unwrap();
        assert!(json.contains("\"exportedAt\""));
        let themes = ThemeBundle::parse(&json).unwrap();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].website_url, "example.com");
    }

    #[test]
    fn parse_accepts_bare_array() {
        let themes = ThemeBundle::parse(r#"[{ "id": "a" }, { "id": "b", "css": "p {}" }]"#).unwrap();
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[1].css, "p {}");
    }

    #[test]
    fn parse_accepts_single_theme() {
        let themes = ThemeBundle::parse(r#"{ "id": "solo", "name": "Solo" }"#).unwrap();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].name, "Solo");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(ThemeBundle::parse("not json").is_err());
        assert!(ThemeBundle::parse("42").is_err());
    }

    #[test]
    fn parse_rejects_empty_list() {
        assert!(matches!(
            ThemeBundle::parse("[]"),
            Err(CollectionError::Import(_))
        ));
    }

    #[test]
    fn parse_rejects_future_version() {
        let raw = r#"{ "version": 99, "exportedAt": "2024-01-01T00:00:00Z", "themes": [{ "id": "a" }] }"#;
        assert!(ThemeBundle::parse(raw).is_err());
    }
}

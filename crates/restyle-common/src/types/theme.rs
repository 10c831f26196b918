use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ThemeId;

/// A named unit of user-authored CSS plus the site pattern it targets.
///
/// Serialized as `{ id, name, description, websiteUrl, css, createdAt,
/// updatedAt }` with ISO-8601 timestamps. Every field but `id` is optional
/// on input so hand-edited or older records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: ThemeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Target pattern; empty means every site.
    #[serde(default)]
    pub website_url: String,
    /// Raw, untransformed CSS source.
    #[serde(default)]
    pub css: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Theme {
    pub fn new(name: impl Into<String>, website_url: impl Into<String>, css: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ThemeId::new(),
            name: name.into(),
            description: String::new(),
            website_url: website_url.into(),
            css: css.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the CSS source and bump `updated_at`.
    pub fn set_css(&mut self, css: impl Into<String>) {
        self.css = css.into();
        self.updated_at = Utc::now();
    }

    /// The built-in starter theme seeded into an empty store.
    pub fn starter() -> Self {
        Self::new(
            "Default",
            "",
            "--accent: #007bff;\n\na {\n  color: var(--accent);\n}\n",
        )
        .with_description("Applies to all sites")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let theme = Theme::new("Dark", "example.com", "body { color: red }");
        let json = serde_json::to_value(&theme).unwrap();
        assert!(json.get("websiteUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["css"], "body { color: red }");
    }

    #[test]
    fn timestamps_are_iso8601() {
        let json = r#"{
            "id": "t1",
            "name": "Dark",
            "description": "",
            "websiteUrl": "",
            "css": "",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T12:30:00.000Z"
        }"#;
        let theme: Theme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert_eq!(theme.id.as_str(), "t1");
    }

    #[test]
    fn missing_optional_fields_default() {
        let theme: Theme = serde_json::from_str(r#"{ "id": "t2" }"#).unwrap();
        assert!(theme.name.is_empty());
        assert!(theme.css.is_empty());
        assert!(theme.website_url.is_empty());
    }

    #[test]
    fn set_css_bumps_updated_at() {
        let mut theme = Theme::new("A", "", "");
        let before = theme.updated_at;
        theme.set_css("a { color: blue }");
        assert_eq!(theme.css, "a { color: blue }");
        assert!(theme.updated_at >= before);
    }

    #[test]
    fn starter_theme_targets_all_sites() {
        let theme = Theme::starter();
        assert!(theme.website_url.is_empty());
        assert!(theme.css.contains("--accent"));
    }
}

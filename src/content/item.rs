//! Content item and media models

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Page,
    Post,
}

/// A content item as stored by the content repository
///
/// Items carry the built-in attributes plus an open-ended set of typed
/// custom fields keyed by name. The API only ever reads these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Numeric identifier
    pub id: u64,

    /// Item title
    pub title: String,

    /// Rendered HTML body
    pub body: String,

    /// URL-safe unique identifier
    pub slug: String,

    /// Page or post
    pub kind: ContentKind,

    /// Whether the item is published
    pub published: bool,

    /// Publication date
    pub date: DateTime<Local>,

    /// Category slugs (posts only; empty for pages)
    pub categories: Vec<String>,

    /// Custom fields keyed by field name
    pub fields: HashMap<String, FieldValue>,
}

impl ContentItem {
    /// Platform status string for the publish flag
    pub fn status(&self) -> &'static str {
        if self.published {
            "publish"
        } else {
            "draft"
        }
    }
}

/// A typed custom field value
///
/// Custom fields have no declared schema in the store itself; the shape of
/// the stored value decides the type. Configured field sets are checked
/// against the loaded items once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Attachment identifier, resolved through the media library
    MediaId(u64),
    /// Short or rich text
    Text(String),
    /// Inline media reference carrying its own size variants
    Media(MediaReference),
}

impl FieldValue {
    /// The text payload, if this is a text field
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A stored media asset with optional named size variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaReference {
    /// Primary (full-size) URL
    pub url: String,

    /// Width of the full-size asset, when known
    #[serde(default)]
    pub width: Option<u32>,

    /// Named size variants, in declaration order
    #[serde(default)]
    pub sizes: IndexMap<String, SizedImage>,
}

/// A single resized variant of a media asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedImage {
    pub url: String,
    pub width: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_untagged_parse() {
        let v: FieldValue = serde_yaml::from_str("hello").unwrap();
        assert_eq!(v, FieldValue::Text("hello".to_string()));

        let v: FieldValue = serde_yaml::from_str("42").unwrap();
        assert_eq!(v, FieldValue::MediaId(42));

        let v: FieldValue = serde_yaml::from_str("url: /img/a.jpg").unwrap();
        match v {
            FieldValue::Media(m) => assert_eq!(m.url, "/img/a.jpg"),
            other => panic!("expected media reference, got {:?}", other),
        }
    }

    #[test]
    fn test_status_string() {
        let item = ContentItem {
            id: 1,
            title: "Home".into(),
            body: String::new(),
            slug: "home".into(),
            kind: ContentKind::Page,
            published: true,
            date: Local::now(),
            categories: Vec::new(),
            fields: HashMap::new(),
        };
        assert_eq!(item.status(), "publish");
    }
}

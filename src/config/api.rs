//! API configuration (_api.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    // Server
    pub bind: String,
    pub port: u16,

    /// Route namespace the two resource endpoints live under
    pub namespace: String,

    // Directory
    pub content_dir: String,

    // Response headers
    pub cache_max_age: u64,
    pub powered_by: String,

    /// Admission-control policy, kept as data so policy changes never
    /// touch gate logic
    pub gate: GateConfig,

    /// Deployment-specific field sets for the two resolvers
    pub fields: FieldsConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            namespace: "/wp-json/api/v1".to_string(),
            content_dir: "content".to_string(),
            cache_max_age: 3600,
            powered_by: "|=|".to_string(),
            gate: GateConfig::default(),
            fields: FieldsConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ApiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The Cache-Control value attached to every API response
    pub fn cache_control(&self) -> String {
        format!("max-age={},public", self.cache_max_age)
    }
}

/// Route gate policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Exact paths that are always rejected
    pub blocked_routes: Vec<String>,

    /// Regex patterns naming the only paths allowed under the reserved prefix
    pub allowed_patterns: Vec<String>,

    /// Prefix under which the platform's generic content API would answer
    pub reserved_prefix: String,

    /// Literal substrings of the raw request URI rejected at the
    /// authentication stage
    pub blocked_uri_fragments: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            blocked_routes: vec![
                "/".to_string(),
                "/wp-json".to_string(),
                "/wp-json/wp/v2".to_string(),
                "/wp-json/wp/v2/".to_string(),
                "/wp-json/api/v1".to_string(),
                "/wp-json/api/v2".to_string(),
            ],
            allowed_patterns: vec![
                r"^/wp-json/api/v1/pages/[A-Za-z0-9\- ]+$".to_string(),
                r"^/wp-json/api/v1/posts/[A-Za-z0-9\- ,]+$".to_string(),
            ],
            reserved_prefix: "/wp-json".to_string(),
            blocked_uri_fragments: vec![
                "/wp-json/wp/v2".to_string(),
                "/index.php/wp-json/wp/v2".to_string(),
                "?rest_route=/wp/v2".to_string(),
            ],
        }
    }
}

/// Field sets resolved by the two resolvers, per deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    /// Text custom fields projected into a page response
    pub page_text: Vec<String>,

    /// Media custom fields projected into a page response
    pub page_media: PageMediaConfig,

    /// Named media slots projected into each post summary
    pub post_slots: Vec<String>,

    /// Suffix of the per-slot type tag field
    pub type_suffix: String,

    /// Suffix of the per-slot vertical variant field
    pub vertical_suffix: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            page_text: vec![
                "subtitle".to_string(),
                "instagram".to_string(),
                "email".to_string(),
                "description".to_string(),
                "icons".to_string(),
            ],
            page_media: PageMediaConfig::default(),
            post_slots: vec![
                "media_1".to_string(),
                "media_2".to_string(),
                "media_3".to_string(),
                "media_4".to_string(),
            ],
            type_suffix: "_type".to_string(),
            vertical_suffix: "_vertical".to_string(),
        }
    }
}

/// The page-level media field triple
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMediaConfig {
    /// Field selecting which media kind the page leads with
    pub type_field: String,
    pub horizontal: String,
    pub vertical: String,
}

impl Default for PageMediaConfig {
    fn default() -> Self {
        Self {
            type_field: "media_type".to_string(),
            horizontal: "media_horizontal".to_string(),
            vertical: "media_vertical".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.namespace, "/wp-json/api/v1");
        assert_eq!(config.cache_control(), "max-age=3600,public");
        assert_eq!(config.gate.blocked_routes.len(), 6);
        assert_eq!(config.fields.post_slots.len(), 4);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
port: 9000
cache_max_age: 60
gate:
  reserved_prefix: /api
  allowed_patterns:
    - "^/api/pages/.+$"
fields:
  page_text: [subtitle]
"#;
        let config: ApiConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.cache_control(), "max-age=60,public");
        assert_eq!(config.gate.reserved_prefix, "/api");
        assert_eq!(config.gate.allowed_patterns.len(), 1);
        // Unset sections keep their defaults
        assert_eq!(config.fields.page_text, vec!["subtitle"]);
        assert_eq!(config.fields.post_slots.len(), 4);
        assert_eq!(config.gate.blocked_routes.len(), 6);
    }
}

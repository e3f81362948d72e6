//! Typed custom field projections
//!
//! Custom fields are dynamically shaped records fetched by string key. The
//! projections here give call sites typed access, and the configured field
//! sets are checked once against the loaded content at startup instead of
//! being trusted ad hoc on every request.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::config::FieldsConfig;
use crate::content::{ContentRepository, FieldValue, MemoryStore};
use crate::media::{self, ImageSource};

/// Project a text custom field; absent or non-text yields None
pub fn text(repo: &dyn ContentRepository, id: u64, name: &str) -> Option<String> {
    repo.field(id, name)
        .and_then(|v| v.as_text().map(|s| s.to_string()))
}

/// Project a text custom field into a JSON value, null when absent
pub fn text_value(repo: &dyn ContentRepository, id: u64, name: &str) -> Value {
    match text(repo, id, name) {
        Some(s) => Value::String(s),
        None => Value::Null,
    }
}

/// Project a media custom field through the image source builder;
/// a missing field degrades to an absent source, never an error
pub fn media(repo: &dyn ContentRepository, id: u64, name: &str) -> ImageSource {
    match repo.field(id, name) {
        Some(value) => media::expand_field(repo, &value),
        None => ImageSource::absent(),
    }
}

/// Validate the configured field sets against the loaded content.
///
/// Text-typed fields (page text fields and every type tag) must hold text
/// wherever they appear. Media slots accept any shape: a rich reference,
/// an attachment id, or a plain URL for non-image media.
pub fn validate(fields: &FieldsConfig, store: &MemoryStore) -> Result<()> {
    let mut text_fields: Vec<String> = fields.page_text.clone();
    text_fields.push(fields.page_media.type_field.clone());
    for slot in &fields.post_slots {
        text_fields.push(format!("{}{}", slot, fields.type_suffix));
    }

    for item in store.items() {
        for name in &text_fields {
            if let Some(value) = item.fields.get(name) {
                if !matches!(value, FieldValue::Text(_)) {
                    bail!(
                        "field '{}' on '{}' (id {}) must be text, got {:?}",
                        name,
                        item.slug,
                        item.id,
                        value
                    );
                }
            }
        }
    }

    Ok(())
}

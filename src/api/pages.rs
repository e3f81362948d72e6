//! Page-by-slug resolver

use axum::{
    extract::{Path, State},
    response::Response,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::config::FieldsConfig;
use crate::content::ContentRepository;
use crate::media::ImageSource;

use super::{fields, json_response, render_error, ApiError, AppState};

lazy_static! {
    /// Platform-level sanitization: anything outside [A-Za-z0-9 -] is stripped
    static ref SLUG_SANITIZER: Regex = Regex::new(r"[^A-Za-z0-9 \-]").unwrap();
}

/// Strip disallowed characters and surrounding whitespace from a slug
pub fn sanitize_slug(raw: &str) -> String {
    SLUG_SANITIZER.replace_all(raw, "").trim().to_string()
}

/// `GET {namespace}/pages/{slug}`
pub async fn page_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match resolve_page(state.repo.as_ref(), &state.config.fields, &slug) {
        Ok(body) => json_response(&state.config, body),
        Err(err) => render_error(&state.config, err),
    }
}

/// Resolve one published page by slug into the flat response shape.
///
/// Core fields are always present; the configured text and media fields
/// are projected on top, null when absent.
pub fn resolve_page(
    repo: &dyn ContentRepository,
    fields_config: &FieldsConfig,
    raw_slug: &str,
) -> Result<Value, ApiError> {
    let slug = sanitize_slug(raw_slug);
    if slug.is_empty() {
        return Err(ApiError::NotFound);
    }

    let item = repo.page_by_slug(&slug).ok_or(ApiError::NotFound)?;

    let mut body = Map::new();
    body.insert("ID".to_string(), json!(item.id));
    body.insert("title".to_string(), json!(item.title));
    body.insert("content".to_string(), json!(item.body));
    body.insert("slug".to_string(), json!(item.slug));
    body.insert(
        "date".to_string(),
        json!(item.date.format("%Y-%m-%d %H:%M:%S").to_string()),
    );
    body.insert("status".to_string(), json!(item.status()));

    for name in &fields_config.page_text {
        body.insert(name.clone(), fields::text_value(repo, item.id, name));
    }

    let page_media = &fields_config.page_media;
    body.insert(
        page_media.type_field.clone(),
        fields::text_value(repo, item.id, &page_media.type_field),
    );
    body.insert(
        page_media.horizontal.clone(),
        source_value(fields::media(repo, item.id, &page_media.horizontal)),
    );
    body.insert(
        page_media.vertical.clone(),
        source_value(fields::media(repo, item.id, &page_media.vertical)),
    );

    Ok(Value::Object(body))
}

/// Serialize a built image source
pub(crate) fn source_value(source: ImageSource) -> Value {
    json!({
        "url": source.url,
        "srcset": source.srcset,
    })
}

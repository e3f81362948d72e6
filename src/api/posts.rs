//! Posts-by-category resolver

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::FieldsConfig;
use crate::content::ContentRepository;

use super::pages::source_value;
use super::{fields, json_response, render_error, ApiError, AppState};

lazy_static! {
    /// Category sanitization additionally admits commas for multi-category requests
    static ref CATEGORY_SANITIZER: Regex = Regex::new(r"[^A-Za-z0-9 \-,]").unwrap();
}

/// Pagination parameters, WordPress-style sentinels: −1 means unlimited
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub num_posts: i64,
    pub per_page: i64,
    pub offset: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            num_posts: -1,
            per_page: -1,
            offset: 0,
        }
    }
}

impl PageParams {
    /// Parse from raw query parameters; anything unparsable keeps the default
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let d = Self::default();
        Self {
            num_posts: int_param(query, "num_posts", d.num_posts),
            per_page: int_param(query, "per_page", d.per_page),
            offset: int_param(query, "offset", d.offset),
        }
    }

    /// The effective window size: per_page governs; num_posts caps only
    /// when no page size was requested
    fn limit(&self) -> Option<usize> {
        if self.per_page > 0 {
            Some(self.per_page as usize)
        } else if self.num_posts > 0 {
            Some(self.num_posts as usize)
        } else {
            None
        }
    }

    /// Offset clamped to a non-negative cursor
    fn cursor(&self) -> usize {
        self.offset.max(0) as usize
    }
}

fn int_param(query: &HashMap<String, String>, key: &str, default: i64) -> i64 {
    query
        .get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// `GET {namespace}/posts/{category}?num_posts=&per_page=&offset=`
pub async fn posts_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let params = PageParams::from_query(&query);
    match resolve_posts(state.repo.as_ref(), &state.config.fields, &category, params) {
        Ok(body) => json_response(&state.config, body),
        Err(err) => render_error(&state.config, err),
    }
}

/// Resolve a page of published posts for the requested categories.
///
/// The comma-separated category list must intersect the live category set
/// before any posts are fetched; an empty intersection is a 404, not an
/// empty result. Each post carries the configured media slots; a missing
/// slot degrades to null URLs instead of failing the request.
pub fn resolve_posts(
    repo: &dyn ContentRepository,
    fields_config: &FieldsConfig,
    raw_category: &str,
    params: PageParams,
) -> Result<Value, ApiError> {
    let categories = requested_categories(raw_category);
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    let known = repo.category_slugs();
    let categories: Vec<String> = categories
        .into_iter()
        .filter(|c| known.contains(c))
        .collect();
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    let page = repo.post_ids_by_category(&categories, params.cursor(), params.limit());
    if page.ids.is_empty() {
        return Err(ApiError::NotFound);
    }

    let posts: Vec<Value> = page
        .ids
        .iter()
        .map(|&id| post_summary(repo, fields_config, id))
        .collect();

    Ok(json!({
        "per_page": params.per_page,
        "offset": params.cursor(),
        "total": page.total,
        "posts": posts,
    }))
}

/// Split, trim and sanitize the raw category path segment
fn requested_categories(raw: &str) -> Vec<String> {
    CATEGORY_SANITIZER
        .replace_all(raw, "")
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// One post entry: title, id, and the configured media slots
fn post_summary(repo: &dyn ContentRepository, fields_config: &FieldsConfig, id: u64) -> Value {
    let mut entry = serde_json::Map::new();
    entry.insert(
        "title".to_string(),
        match repo.title(id) {
            Some(t) => json!(t),
            None => Value::Null,
        },
    );
    entry.insert("ID".to_string(), json!(id));

    for slot in &fields_config.post_slots {
        let type_field = format!("{}{}", slot, fields_config.type_suffix);
        let vertical_field = format!("{}{}", slot, fields_config.vertical_suffix);
        entry.insert(
            slot.clone(),
            json!({
                "type": fields::text_value(repo, id, &type_field),
                "source": source_value(fields::media(repo, id, slot)),
                "vertical": source_value(fields::media(repo, id, &vertical_field)),
            }),
        );
    }

    Value::Object(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentItem, ContentKind, FieldValue, MemoryStore};
    use chrono::Local;
    use std::collections::HashMap as Map;

    fn post(id: u64, category: &str) -> ContentItem {
        let mut fields = Map::new();
        fields.insert("media_1_type".to_string(), FieldValue::Text("image".into()));
        fields.insert(
            "media_1".to_string(),
            FieldValue::Text(format!("/i/post-{}.jpg", id)),
        );
        ContentItem {
            id,
            title: format!("Post {}", id),
            body: String::new(),
            slug: format!("post-{}", id),
            kind: ContentKind::Post,
            published: true,
            date: Local::now(),
            categories: vec![category.to_string()],
            fields,
        }
    }

    fn news_store(n: usize) -> MemoryStore {
        let mut store = MemoryStore::new();
        for i in 0..n {
            store.insert_item(post(i as u64 + 1, "news"));
        }
        store
    }

    fn params(per_page: i64, offset: i64) -> PageParams {
        PageParams {
            num_posts: -1,
            per_page,
            offset,
        }
    }

    #[test]
    fn test_resolve_posts_pagination() {
        let store = news_store(12);
        let body =
            resolve_posts(&store, &FieldsConfig::default(), "news", params(5, 0)).unwrap();

        assert_eq!(body["total"], 12);
        assert_eq!(body["per_page"], 5);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["posts"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_resolve_posts_unlimited_default() {
        let store = news_store(3);
        let body = resolve_posts(
            &store,
            &FieldsConfig::default(),
            "news",
            PageParams::default(),
        )
        .unwrap();

        assert_eq!(body["per_page"], -1);
        assert_eq!(body["posts"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_resolve_posts_empty_category() {
        let store = news_store(3);
        assert!(matches!(
            resolve_posts(&store, &FieldsConfig::default(), "", params(-1, 0)),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn test_resolve_posts_unknown_category() {
        let store = news_store(3);
        assert!(matches!(
            resolve_posts(&store, &FieldsConfig::default(), "sports", params(-1, 0)),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn test_resolve_posts_comma_list_intersects() {
        let store = news_store(3);
        let body = resolve_posts(
            &store,
            &FieldsConfig::default(),
            "sports,news",
            params(-1, 0),
        )
        .unwrap();
        assert_eq!(body["total"], 3);
    }

    #[test]
    fn test_post_entry_shape() {
        let store = news_store(1);
        let body =
            resolve_posts(&store, &FieldsConfig::default(), "news", params(-1, 0)).unwrap();
        let entry = &body["posts"][0];

        assert_eq!(entry["title"], "Post 1");
        assert_eq!(entry["ID"], 1);
        assert_eq!(entry["media_1"]["type"], "image");
        assert_eq!(entry["media_1"]["source"]["url"], "/i/post-1.jpg");
        // Unset slots degrade to null URLs, never an error
        assert_eq!(entry["media_2"]["type"], Value::Null);
        assert_eq!(entry["media_2"]["source"]["url"], Value::Null);
        assert_eq!(entry["media_2"]["vertical"]["url"], Value::Null);
    }

    #[test]
    fn test_offset_past_end() {
        let store = news_store(3);
        assert!(matches!(
            resolve_posts(&store, &FieldsConfig::default(), "news", params(5, 10)),
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn test_num_posts_caps_when_no_page_size() {
        let store = news_store(5);
        let body = resolve_posts(
            &store,
            &FieldsConfig::default(),
            "news",
            PageParams {
                num_posts: 2,
                per_page: -1,
                offset: 0,
            },
        )
        .unwrap();
        assert_eq!(body["posts"].as_array().unwrap().len(), 2);
        assert_eq!(body["total"], 5);
    }

    #[test]
    fn test_negative_offset_clamped() {
        let store = news_store(3);
        let body =
            resolve_posts(&store, &FieldsConfig::default(), "news", params(-1, -7)).unwrap();
        assert_eq!(body["offset"], 0);
    }
}

//! Content loader - builds the in-memory store from a content directory
//!
//! Layout: `_posts/*.md` are posts, any other markdown file is a page,
//! `_media.yml` is the media library keyed by attachment id. Bodies are
//! markdown with YAML front-matter, rendered to HTML at load time.

use anyhow::{Context, Result};
use chrono::Local;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{markdown, ContentItem, ContentKind, FieldValue, FrontMatter, MediaReference, MemoryStore};
use crate::ContentGate;

/// Media library file inside the content directory
const MEDIA_FILE: &str = "_media.yml";

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    app: &'a ContentGate,
}

impl<'a> ContentLoader<'a> {
    pub fn new(app: &'a ContentGate) -> Self {
        Self { app }
    }

    /// Load everything into a fresh store
    pub fn load_store(&self) -> Result<MemoryStore> {
        let mut store = MemoryStore::new();

        for (id, media) in self.load_media()? {
            store.insert_media(id, media);
        }

        for item in self.load_items()? {
            store.insert_item(item);
        }

        tracing::info!(
            "Loaded {} content items from {:?}",
            store.items().len(),
            self.app.content_dir
        );
        Ok(store)
    }

    /// Load the media library, if present
    fn load_media(&self) -> Result<HashMap<u64, MediaReference>> {
        let path = self.app.content_dir.join(MEDIA_FILE);
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&path)?;
        let media: HashMap<u64, MediaReference> =
            serde_yaml::from_str(&content).with_context(|| format!("parsing {:?}", path))?;
        Ok(media)
    }

    /// Load all pages and posts, assigning ids to files that declare none
    pub fn load_items(&self) -> Result<Vec<ContentItem>> {
        let mut pending: Vec<(Option<u64>, ContentItem)> = Vec::new();

        let posts_dir = self.app.content_dir.join("_posts");
        if posts_dir.exists() {
            for entry in WalkDir::new(&posts_dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && is_markdown_file(path) {
                    match self.load_item(path, ContentKind::Post) {
                        Ok(item) => pending.push(item),
                        Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
                    }
                }
            }
        }

        for entry in WalkDir::new(&self.app.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            // Underscore-prefixed entries are posts, media, or drafts
            let relative = path.strip_prefix(&self.app.content_dir).unwrap_or(path);
            let first = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str());
            if matches!(first, Some(f) if f.starts_with('_')) {
                continue;
            }

            if path.is_file() && is_markdown_file(path) {
                match self.load_item(path, ContentKind::Page) {
                    Ok(item) => pending.push(item),
                    Err(e) => tracing::warn!("Failed to load page {:?}: {}", path, e),
                }
            }
        }

        // Explicit ids win; the rest are numbered past the highest one
        let mut next_id = pending
            .iter()
            .filter_map(|(id, _)| *id)
            .max()
            .unwrap_or(0);

        Ok(pending
            .into_iter()
            .map(|(explicit, mut item)| {
                item.id = explicit.unwrap_or_else(|| {
                    next_id += 1;
                    next_id
                });
                item
            })
            .collect())
    }

    /// Load a single item from a file
    fn load_item(&self, path: &Path, kind: ContentKind) -> Result<(Option<u64>, ContentItem)> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let file_modified = fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok())
            .map(chrono::DateTime::<Local>::from);

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let title = fm.title.clone().unwrap_or_else(|| stem.to_string());
        let slug = fm.slug.clone().unwrap_or_else(|| slug::slugify(stem));

        let mut fields = HashMap::new();
        for (name, value) in fm.fields {
            match serde_yaml::from_value::<FieldValue>(value) {
                Ok(v) => {
                    fields.insert(name, v);
                }
                Err(e) => {
                    tracing::warn!("Skipping field '{}' in {:?}: {}", name, path, e);
                }
            }
        }

        let item = ContentItem {
            id: 0, // assigned by load_items
            title,
            body: markdown::render(body),
            slug,
            kind,
            published: fm.published,
            date,
            categories: fm.categories,
            fields,
        };

        Ok((fm.id, item))
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

//! Read interface over the content store
//!
//! The API never owns content; it reads through [`ContentRepository`].
//! [`MemoryStore`] is the built-in implementation, populated by the
//! content loader or directly by tests.

use std::collections::HashMap;

use crate::media::SizeVariant;

use super::{ContentItem, ContentKind, FieldValue, MediaReference, SizedImage};

/// One page of a category query: the returned ids plus the size of the
/// full match set (not just the returned window).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    pub ids: Vec<u64>,
    pub total: usize,
}

/// The outbound collaborator interface to the content store
pub trait ContentRepository: Send + Sync {
    /// Fetch exactly one published page-kind item by slug
    fn page_by_slug(&self, slug: &str) -> Option<ContentItem>;

    /// Fetch ids of published posts matching any of the given categories,
    /// in the store's default order, honoring offset and limit
    fn post_ids_by_category(
        &self,
        categories: &[String],
        offset: usize,
        limit: Option<usize>,
    ) -> CategoryPage;

    /// Fetch a named custom field of an item
    fn field(&self, id: u64, name: &str) -> Option<FieldValue>;

    /// Fetch one size variant of an attachment
    fn attachment_size(&self, id: u64, variant: SizeVariant) -> Option<SizedImage>;

    /// The live set of known category slugs
    fn category_slugs(&self) -> Vec<String>;

    /// Fetch an item's title
    fn title(&self, id: u64) -> Option<String>;
}

/// In-memory content store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<ContentItem>,
    index: HashMap<u64, usize>,
    media: HashMap<u64, MediaReference>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content item. Later items with a duplicate id replace nothing;
    /// the first id wins and the duplicate is dropped with a warning.
    pub fn insert_item(&mut self, item: ContentItem) {
        if self.index.contains_key(&item.id) {
            tracing::warn!("Duplicate content id {}, dropping '{}'", item.id, item.slug);
            return;
        }
        self.index.insert(item.id, self.items.len());
        self.items.push(item);
    }

    /// Register an attachment in the media library
    pub fn insert_media(&mut self, id: u64, media: MediaReference) {
        self.media.insert(id, media);
    }

    pub fn item(&self, id: u64) -> Option<&ContentItem> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn media(&self, id: u64) -> Option<&MediaReference> {
        self.media.get(&id)
    }
}

impl ContentRepository for MemoryStore {
    fn page_by_slug(&self, slug: &str) -> Option<ContentItem> {
        self.items
            .iter()
            .find(|i| i.kind == ContentKind::Page && i.published && i.slug == slug)
            .cloned()
    }

    fn post_ids_by_category(
        &self,
        categories: &[String],
        offset: usize,
        limit: Option<usize>,
    ) -> CategoryPage {
        let matching: Vec<u64> = self
            .items
            .iter()
            .filter(|i| {
                i.kind == ContentKind::Post
                    && i.published
                    && i.categories.iter().any(|c| categories.contains(c))
            })
            .map(|i| i.id)
            .collect();

        let total = matching.len();
        let ids: Vec<u64> = match limit {
            Some(n) => matching.into_iter().skip(offset).take(n).collect(),
            None => matching.into_iter().skip(offset).collect(),
        };

        CategoryPage { ids, total }
    }

    fn field(&self, id: u64, name: &str) -> Option<FieldValue> {
        self.item(id).and_then(|i| i.fields.get(name).cloned())
    }

    fn attachment_size(&self, id: u64, variant: SizeVariant) -> Option<SizedImage> {
        let media = self.media.get(&id)?;
        match variant {
            SizeVariant::Full => Some(SizedImage {
                url: media.url.clone(),
                width: media.width.unwrap_or(0),
            }),
            other => media.sizes.get(other.key()).cloned(),
        }
    }

    fn category_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self
            .items
            .iter()
            .flat_map(|i| i.categories.iter().cloned())
            .collect();
        slugs.sort();
        slugs.dedup();
        slugs
    }

    fn title(&self, id: u64) -> Option<String> {
        self.item(id).map(|i| i.title.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn post(id: u64, slug: &str, categories: &[&str], published: bool) -> ContentItem {
        ContentItem {
            id,
            title: format!("Post {}", id),
            body: String::new(),
            slug: slug.to_string(),
            kind: ContentKind::Post,
            published,
            date: Local::now(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            fields: HashMap::new(),
        }
    }

    fn page(id: u64, slug: &str, published: bool) -> ContentItem {
        ContentItem {
            id,
            title: format!("Page {}", id),
            body: String::new(),
            slug: slug.to_string(),
            kind: ContentKind::Page,
            published,
            date: Local::now(),
            categories: Vec::new(),
            fields: HashMap::new(),
        }
    }

    fn store_with_posts(n: usize) -> MemoryStore {
        let mut store = MemoryStore::new();
        for i in 0..n {
            store.insert_item(post(i as u64 + 1, &format!("post-{}", i), &["news"], true));
        }
        store
    }

    #[test]
    fn test_page_by_slug_filters_kind_and_status() {
        let mut store = MemoryStore::new();
        store.insert_item(page(1, "home", true));
        store.insert_item(page(2, "draft-page", false));
        store.insert_item(post(3, "home", &["news"], true));

        assert_eq!(store.page_by_slug("home").unwrap().id, 1);
        assert!(store.page_by_slug("draft-page").is_none());
        assert!(store.page_by_slug("missing").is_none());
    }

    #[test]
    fn test_category_query_pagination() {
        let store = store_with_posts(12);
        let cats = vec!["news".to_string()];

        let page = store.post_ids_by_category(&cats, 0, Some(5));
        assert_eq!(page.total, 12);
        assert_eq!(page.ids.len(), 5);

        let page = store.post_ids_by_category(&cats, 10, Some(5));
        assert_eq!(page.total, 12);
        assert_eq!(page.ids.len(), 2);

        let page = store.post_ids_by_category(&cats, 0, None);
        assert_eq!(page.ids.len(), 12);
    }

    #[test]
    fn test_category_query_no_match() {
        let store = store_with_posts(3);
        let page = store.post_ids_by_category(&["sports".to_string()], 0, None);
        assert_eq!(page.total, 0);
        assert!(page.ids.is_empty());
    }

    #[test]
    fn test_unpublished_posts_excluded() {
        let mut store = MemoryStore::new();
        store.insert_item(post(1, "a", &["news"], true));
        store.insert_item(post(2, "b", &["news"], false));

        let page = store.post_ids_by_category(&["news".to_string()], 0, None);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_category_slugs_deduped() {
        let mut store = MemoryStore::new();
        store.insert_item(post(1, "a", &["news", "tech"], true));
        store.insert_item(post(2, "b", &["news"], true));

        assert_eq!(store.category_slugs(), vec!["news", "tech"]);
    }

    #[test]
    fn test_attachment_size_full_vs_variant() {
        let mut store = MemoryStore::new();
        let mut sizes = indexmap::IndexMap::new();
        sizes.insert(
            "thumbnail".to_string(),
            SizedImage {
                url: "/img/a-150.jpg".to_string(),
                width: 150,
            },
        );
        store.insert_media(
            7,
            MediaReference {
                url: "/img/a.jpg".to_string(),
                width: Some(2048),
                sizes,
            },
        );

        let full = store.attachment_size(7, SizeVariant::Full).unwrap();
        assert_eq!(full.url, "/img/a.jpg");
        assert_eq!(full.width, 2048);

        let thumb = store.attachment_size(7, SizeVariant::Thumbnail).unwrap();
        assert_eq!(thumb.width, 150);

        assert!(store.attachment_size(7, SizeVariant::Large).is_none());
        assert!(store.attachment_size(99, SizeVariant::Full).is_none());
    }
}

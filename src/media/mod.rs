//! Image source set building
//!
//! Turns a media reference (or a bare attachment id) into a `{url, srcset}`
//! pair. The srcset always lists the same five variants in descending-width
//! declaration order; the canonical single URL is an explicit argument
//! because the two call shapes historically disagreed on it (rich media
//! objects use the extra-large variant, id lookups use the full-size asset)
//! and the difference is kept on purpose.

use serde::Serialize;

use crate::content::{ContentRepository, FieldValue, MediaReference};

/// Named size variants of a stored media asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeVariant {
    Thumbnail,
    Medium,
    MediumLarge,
    Large,
    XqLarge,
    X2qLarge,
    Full,
}

impl SizeVariant {
    /// The key used in a media reference's sizes map
    pub fn key(&self) -> &'static str {
        match self {
            SizeVariant::Thumbnail => "thumbnail",
            SizeVariant::Medium => "medium",
            SizeVariant::MediumLarge => "medium_large",
            SizeVariant::Large => "large",
            SizeVariant::XqLarge => "xq-large",
            SizeVariant::X2qLarge => "x2q-large",
            SizeVariant::Full => "full",
        }
    }
}

/// The variants that make up a srcset, in the fixed output order
pub const SRCSET_VARIANTS: [SizeVariant; 5] = [
    SizeVariant::Thumbnail,
    SizeVariant::Medium,
    SizeVariant::MediumLarge,
    SizeVariant::Large,
    SizeVariant::XqLarge,
];

/// A built image source: one canonical URL plus a srcset candidate list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSource {
    pub url: Option<String>,
    pub srcset: String,
}

impl ImageSource {
    /// An empty source for a missing media slot
    pub fn absent() -> Self {
        Self {
            url: None,
            srcset: String::new(),
        }
    }
}

/// Build a source from a rich media reference (shape carrying its own sizes)
///
/// With a sizes map, the srcset lists the five [`SRCSET_VARIANTS`] as
/// `"<url> <width>w"` tokens; missing variants are skipped. Without one,
/// the bare URL is returned with an empty srcset.
pub fn from_reference(media: &MediaReference, canonical: SizeVariant) -> ImageSource {
    if media.sizes.is_empty() {
        return ImageSource {
            url: Some(media.url.clone()),
            srcset: String::new(),
        };
    }

    let srcset = SRCSET_VARIANTS
        .iter()
        .filter_map(|v| media.sizes.get(v.key()))
        .map(|s| format!("{} {}w", s.url, s.width))
        .collect::<Vec<_>>()
        .join(", ");

    let url = media
        .sizes
        .get(canonical.key())
        .map(|s| s.url.clone())
        .or_else(|| Some(media.url.clone()));

    ImageSource { url, srcset }
}

/// Build a source from a bare attachment id, resolving each variant
/// through the repository
pub fn from_attachment(
    repo: &dyn ContentRepository,
    id: u64,
    canonical: SizeVariant,
) -> ImageSource {
    let srcset = SRCSET_VARIANTS
        .iter()
        .filter_map(|&v| repo.attachment_size(id, v))
        .map(|s| format!("{} {}w", s.url, s.width))
        .collect::<Vec<_>>()
        .join(", ");

    let url = repo.attachment_size(id, canonical).map(|s| s.url);

    ImageSource { url, srcset }
}

/// Expand a media custom field into an image source
///
/// Rich references resolve their canonical URL to the extra-large variant;
/// bare ids resolve it to the full-size asset. Text fields (a media slot
/// holding a plain URL) pass the text through unchanged.
pub fn expand_field(repo: &dyn ContentRepository, value: &FieldValue) -> ImageSource {
    match value {
        FieldValue::Media(media) => from_reference(media, SizeVariant::X2qLarge),
        FieldValue::MediaId(id) => from_attachment(repo, *id, SizeVariant::Full),
        FieldValue::Text(url) => ImageSource {
            url: Some(url.clone()),
            srcset: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemoryStore, SizedImage};
    use indexmap::IndexMap;

    fn sized(url: &str, width: u32) -> SizedImage {
        SizedImage {
            url: url.to_string(),
            width,
        }
    }

    fn full_reference() -> MediaReference {
        let mut sizes = IndexMap::new();
        sizes.insert("thumbnail".to_string(), sized("/i/a-150.jpg", 150));
        sizes.insert("medium".to_string(), sized("/i/a-300.jpg", 300));
        sizes.insert("medium_large".to_string(), sized("/i/a-768.jpg", 768));
        sizes.insert("large".to_string(), sized("/i/a-1024.jpg", 1024));
        sizes.insert("xq-large".to_string(), sized("/i/a-1600.jpg", 1600));
        sizes.insert("x2q-large".to_string(), sized("/i/a-2048.jpg", 2048));
        MediaReference {
            url: "/i/a.jpg".to_string(),
            width: Some(4096),
            sizes,
        }
    }

    #[test]
    fn test_srcset_order_and_count() {
        let src = from_reference(&full_reference(), SizeVariant::X2qLarge);
        assert_eq!(
            src.srcset,
            "/i/a-150.jpg 150w, /i/a-300.jpg 300w, /i/a-768.jpg 768w, \
             /i/a-1024.jpg 1024w, /i/a-1600.jpg 1600w"
        );
        assert_eq!(src.srcset.matches("w").count(), 5);
        assert_eq!(src.url, Some("/i/a-2048.jpg".to_string()));
    }

    #[test]
    fn test_no_sizes_falls_back_to_bare_url() {
        let media = MediaReference {
            url: "/i/plain.jpg".to_string(),
            width: None,
            sizes: IndexMap::new(),
        };
        let src = from_reference(&media, SizeVariant::X2qLarge);
        assert_eq!(src.url, Some("/i/plain.jpg".to_string()));
        assert_eq!(src.srcset, "");
    }

    #[test]
    fn test_missing_variant_skipped() {
        let mut media = full_reference();
        media.sizes.shift_remove("medium");
        let src = from_reference(&media, SizeVariant::X2qLarge);
        assert!(!src.srcset.contains("300w"));
        assert_eq!(src.srcset.split(", ").count(), 4);
    }

    #[test]
    fn test_missing_canonical_falls_back() {
        let mut media = full_reference();
        media.sizes.shift_remove("x2q-large");
        let src = from_reference(&media, SizeVariant::X2qLarge);
        assert_eq!(src.url, Some("/i/a.jpg".to_string()));
    }

    #[test]
    fn test_attachment_shape_uses_full_size() {
        let mut store = MemoryStore::new();
        store.insert_media(5, full_reference());

        let src = from_attachment(&store, 5, SizeVariant::Full);
        // Canonical URL diverges from the rich-reference shape on purpose.
        assert_eq!(src.url, Some("/i/a.jpg".to_string()));
        assert_eq!(src.srcset.split(", ").count(), 5);
    }

    #[test]
    fn test_attachment_missing_id() {
        let store = MemoryStore::new();
        let src = from_attachment(&store, 404, SizeVariant::Full);
        assert_eq!(src.url, None);
        assert_eq!(src.srcset, "");
    }

    #[test]
    fn test_expand_field_shapes() {
        let mut store = MemoryStore::new();
        store.insert_media(5, full_reference());

        let rich = expand_field(&store, &FieldValue::Media(full_reference()));
        assert_eq!(rich.url, Some("/i/a-2048.jpg".to_string()));

        let by_id = expand_field(&store, &FieldValue::MediaId(5));
        assert_eq!(by_id.url, Some("/i/a.jpg".to_string()));

        let text = expand_field(&store, &FieldValue::Text("video.mp4".to_string()));
        assert_eq!(text.url, Some("video.mp4".to_string()));
        assert_eq!(text.srcset, "");
    }
}

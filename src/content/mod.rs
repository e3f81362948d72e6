//! Content module - models, the store read interface, and the loader

mod frontmatter;
mod item;
pub mod loader;
pub mod markdown;
mod repository;

pub use frontmatter::FrontMatter;
pub use item::{ContentItem, ContentKind, FieldValue, MediaReference, SizedImage};
pub use repository::{CategoryPage, ContentRepository, MemoryStore};

//! content-gate: a read-only content API with route allow-listing
//!
//! This crate serves two query shapes over a CMS-style content store -
//! "fetch one page by slug" and "fetch a page of posts by category" -
//! while a route gate hides every other path of the platform API surface
//! behind uniform 404s.

pub mod api;
pub mod config;
pub mod content;
pub mod gate;
pub mod media;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// Configuration file name in the base directory
const CONFIG_FILE: &str = "_api.yml";

/// The main application
#[derive(Clone)]
pub struct ContentGate {
    /// API configuration
    pub config: config::ApiConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory
    pub content_dir: std::path::PathBuf,
}

impl ContentGate {
    /// Create an instance from a base directory, reading `_api.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::ApiConfig::load(&config_path)?
        } else {
            config::ApiConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Load the content store from the content directory
    pub fn load_store(&self) -> Result<content::MemoryStore> {
        content::loader::ContentLoader::new(self).load_store()
    }
}

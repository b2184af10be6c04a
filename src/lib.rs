//! mdblog: a personal blog server
//!
//! Renders a homepage listing posts and individual article pages from
//! Markdown files with front-matter, with syntax-highlighted code blocks
//! and anchor-linkable headings.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The blog application root
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding `<slug>/index.md` article folders
    pub articles_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let articles_dir = base_dir.join(&config.articles_dir);

        Ok(Self {
            config,
            base_dir,
            articles_dir,
        })
    }
}

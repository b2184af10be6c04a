//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    /// About-me paragraph shown on the index page and used as its
    /// og:description
    pub bio: String,

    // URL
    /// Canonical base URL, used when a request host is unavailable
    pub url: String,

    // Social
    /// Twitter handle without the leading @
    pub twitter: String,

    // Directory
    /// Directory holding `<slug>/index.md` article folders
    pub articles_dir: String,

    // Server defaults
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "A Tech Blog".to_string(),
            author: "Anonymous".to_string(),
            bio: String::new(),
            url: "http://localhost:4000".to_string(),
            twitter: String::new(),
            articles_dir: "articles".to_string(),
            server: ServerConfig::default(),
            extra: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Server bind defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

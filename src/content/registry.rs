//! Content registry - maps validated slugs to content files
//!
//! Built once at startup by scanning the articles directory. Route input is
//! only ever turned into a filesystem path through this map, so a request
//! can never name a file the scan did not register.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use super::{ContentError, FrontMatter, PostSummary};

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap();
}

/// Registry of all published articles, keyed by slug.
#[derive(Debug, Default)]
pub struct ContentRegistry {
    /// Summaries sorted newest-first, for the index page
    posts: Vec<PostSummary>,
    paths: HashMap<String, PathBuf>,
}

impl ContentRegistry {
    /// Scan `<articles_dir>/<slug>/index.md` files into a registry.
    ///
    /// Files with malformed front-matter are skipped with a warning; a
    /// missing directory yields an empty registry.
    pub fn scan(articles_dir: &Path) -> Result<Self> {
        let mut registry = ContentRegistry::default();

        if !articles_dir.exists() {
            tracing::warn!("articles directory {:?} does not exist", articles_dir);
            return Ok(registry);
        }

        for entry in WalkDir::new(articles_dir)
            .min_depth(2)
            .max_depth(2)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.file_name().and_then(|n| n.to_str()) != Some("index.md") {
                continue;
            }

            let Some(slug) = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
            else {
                continue;
            };

            if !is_valid_slug(slug) {
                tracing::warn!("skipping {:?}: `{}` is not a valid slug", path, slug);
                continue;
            }

            match load_summary(slug, path) {
                Ok(summary) => {
                    registry.paths.insert(slug.to_string(), path.to_path_buf());
                    registry.posts.push(summary);
                }
                Err(e) => {
                    tracing::warn!("skipping {:?}: {:#}", path, e);
                }
            }
        }

        // newest first
        registry.posts.sort_by(|a, b| b.published.cmp(&a.published));

        tracing::info!("registered {} articles", registry.posts.len());
        Ok(registry)
    }

    /// Resolve a slug to its registered content file.
    ///
    /// Anything not registered - including slugs with path separators, dots
    /// or uppercase characters - is a [`ContentError::NotFound`] before any
    /// file access happens.
    pub fn resolve(&self, slug: &str) -> Result<&Path, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::NotFound(slug.to_string()));
        }
        self.paths
            .get(slug)
            .map(PathBuf::as_path)
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))
    }

    /// All registered posts, newest first
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Check that a slug is URL-safe: lowercase alphanumerics and hyphens only
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

fn load_summary(slug: &str, path: &Path) -> Result<PostSummary> {
    let content = fs::read_to_string(path)?;
    let (meta, _body) = FrontMatter::load(&content)?;

    Ok(PostSummary {
        slug: slug.to_string(),
        title: meta.title,
        date: meta.date,
        description: meta.description,
        published: meta.published,
        source: path.to_path_buf(),
    })
}

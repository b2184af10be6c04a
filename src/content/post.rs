//! Post and article models

use chrono::NaiveDate;
use std::path::PathBuf;

use super::ArticleMeta;

/// A post as listed on the index page.
///
/// Derived from a content file's front-matter when the registry is built;
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct PostSummary {
    /// URL-safe identifier; route segment and content lookup key
    pub slug: String,

    /// Post title
    pub title: String,

    /// Display date, as authored
    pub date: String,

    /// One-line description for the index and page metadata
    pub description: String,

    /// Parsed date, newest-first ordering key
    pub published: NaiveDate,

    /// Content file backing this post
    pub source: PathBuf,
}

/// A fully rendered article, computed fresh per request.
#[derive(Debug, Clone)]
pub struct Article {
    pub slug: String,

    /// Sanitized HTML body; inserted into the page verbatim
    pub html: String,

    /// Validated front-matter
    pub meta: ArticleMeta,

    /// Social-preview image URL derived from the requesting host
    pub og_image_url: String,
}

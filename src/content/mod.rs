//! Content module - articles, front-matter, and the rendering pipeline

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod registry;

pub use frontmatter::{ArticleMeta, FrontMatter, FrontMatterError};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{Article, PostSummary};
pub use registry::ContentRegistry;

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the content pipeline.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No registered article for the requested slug. Maps to HTTP 404.
    #[error("no article registered for slug `{0}`")]
    NotFound(String),

    /// A registered file failed front-matter parsing or validation.
    #[error("malformed article at {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

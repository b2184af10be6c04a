//! Content loader - resolves a slug to a rendered article

use super::{Article, ContentError, ContentRegistry, FrontMatter, MarkdownRenderer};
use crate::helpers::url::og_image_url;

/// Loads and renders articles through the registry.
///
/// One file read per call; nothing is cached between requests.
pub struct ContentLoader<'a> {
    registry: &'a ContentRegistry,
    renderer: &'a MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    pub fn new(registry: &'a ContentRegistry, renderer: &'a MarkdownRenderer) -> Self {
        Self { registry, renderer }
    }

    /// Load the article for a slug, deriving the social-preview image URL
    /// from the requesting host.
    ///
    /// Unknown slugs - and files that disappeared since the registry scan -
    /// are [`ContentError::NotFound`].
    pub async fn load(&self, slug: &str, host: &str) -> Result<Article, ContentError> {
        let path = self.registry.resolve(slug)?;

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentError::NotFound(slug.to_string()));
            }
            Err(e) => return Err(ContentError::Io(e)),
        };

        let (meta, body) = FrontMatter::load(&raw).map_err(|source| ContentError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        let html = self.renderer.render(body);

        Ok(Article {
            slug: slug.to_string(),
            html,
            meta,
            og_image_url: og_image_url(host, slug),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(dir: &std::path::Path) -> ContentRegistry {
        let article_dir = dir.join("first-post");
        fs::create_dir_all(&article_dir).unwrap();
        fs::write(
            article_dir.join("index.md"),
            "---\ntitle: First Post\ndescription: A post\ndate: 9 May, 2025\n---\n\n# First Post\n\nHello.\n",
        )
        .unwrap();
        ContentRegistry::scan(dir).unwrap()
    }

    #[tokio::test]
    async fn test_load_renders_article() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = fixture(tmp.path());
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(&registry, &renderer);

        let article = loader.load("first-post", "blog.example.com").await.unwrap();
        assert_eq!(article.meta.title, "First Post");
        assert!(article.html.contains(r##"<h1 id="first-post">First Post</h1>"##));
        assert_eq!(
            article.og_image_url,
            "https://blog.example.com/articles/first-post/og-image.png"
        );
    }

    #[tokio::test]
    async fn test_load_unknown_slug_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = fixture(tmp.path());
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(&registry, &renderer);

        assert!(matches!(
            loader.load("missing", "localhost").await,
            Err(ContentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_load_vanished_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = fixture(tmp.path());
        fs::remove_file(tmp.path().join("first-post/index.md")).unwrap();

        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(&registry, &renderer);
        assert!(matches!(
            loader.load("first-post", "localhost").await,
            Err(ContentError::NotFound(_))
        ));
    }
}

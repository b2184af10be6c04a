//! Page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Autoescaping is off:
//! the article body is pre-sanitized HTML, and everything else put into a
//! context is escaped by the html helpers first.

use anyhow::Result;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Article, PostSummary};
use crate::helpers::html::{article_meta_tags, html_escape, index_meta_tags};

/// Template renderer with embedded blog templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("layout.html")),
            ("index.html", include_str!("index.html")),
            ("article.html", include_str!("article.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render the index page for a list of posts
    pub fn render_index(&self, config: &SiteConfig, posts: &[PostSummary]) -> Result<String> {
        let mut context = self.base_context(config);
        context.insert("page_title", &html_escape(&config.title));
        context.insert("meta_tags", &index_meta_tags(config));
        context.insert("bio", &html_escape(&config.bio));

        let posts: Vec<IndexEntry> = posts.iter().map(IndexEntry::from).collect();
        context.insert("posts", &posts);

        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render an article page
    pub fn render_article(&self, config: &SiteConfig, article: &Article) -> Result<String> {
        let mut context = self.base_context(config);
        context.insert("page_title", &html_escape(&article.meta.title));
        context.insert(
            "meta_tags",
            &article_meta_tags(config, &article.meta, &article.og_image_url),
        );
        context.insert("date", &html_escape(&article.meta.date));
        context.insert("content", &article.html);

        Ok(self.tera.render("article.html", &context)?)
    }

    fn base_context(&self, config: &SiteConfig) -> Context {
        let mut context = Context::new();
        context.insert("site_title", &html_escape(&config.title));
        context.insert("twitter", &html_escape(&config.twitter));
        context
    }
}

/// An index post entry with display strings already escaped
#[derive(serde::Serialize)]
struct IndexEntry {
    slug: String,
    title: String,
    date: String,
    description: String,
}

impl From<&PostSummary> for IndexEntry {
    fn from(post: &PostSummary) -> Self {
        Self {
            slug: post.slug.clone(),
            title: html_escape(&post.title),
            date: html_escape(&post.date),
            description: html_escape(&post.description),
        }
    }
}

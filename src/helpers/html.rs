//! HTML helper functions

use crate::config::SiteConfig;
use crate::content::ArticleMeta;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Open Graph and Twitter card tags for an article page
pub fn article_meta_tags(config: &SiteConfig, meta: &ArticleMeta, og_image_url: &str) -> String {
    let title = html_escape(&meta.title);
    let description = html_escape(&meta.description);
    let image = html_escape(og_image_url);

    let mut tags = vec![
        format!(r#"<meta property="og:title" content="{}">"#, title),
        format!(r#"<meta property="og:image" content="{}">"#, image),
        format!(r#"<meta name="og:description" content="{}">"#, description),
        r#"<meta name="twitter:card" content="summary_large_image">"#.to_string(),
        format!(r#"<meta name="twitter:title" content="{}">"#, title),
        format!(r#"<meta name="twitter:description" content="{}">"#, description),
        format!(r#"<meta name="twitter:image" content="{}">"#, image),
    ];

    if !config.twitter.is_empty() {
        let handle = html_escape(&format!("@{}", config.twitter));
        tags.push(format!(r#"<meta name="twitter:site" content="{}">"#, handle));
        tags.push(format!(r#"<meta name="twitter:creator" content="{}">"#, handle));
    }

    tags.join("\n")
}

/// Open Graph tags for the index page
pub fn index_meta_tags(config: &SiteConfig) -> String {
    let tags = vec![
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(&config.title)
        ),
        format!(
            r#"<meta name="og:description" content="{}">"#,
            html_escape(&config.bio)
        ),
    ];

    tags.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn test_meta() -> ArticleMeta {
        ArticleMeta {
            title: "Tests & <Quotes>".to_string(),
            description: "A \"description\"".to_string(),
            date: "9 May, 2025".to_string(),
            published: NaiveDate::from_ymd_opt(2025, 5, 9).unwrap(),
            extra: IndexMap::new(),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_article_meta_tags_escaped() {
        let mut config = SiteConfig::default();
        config.twitter = "nickblow".to_string();

        let tags = article_meta_tags(&config, &test_meta(), "https://h/articles/s/og-image.png");
        assert!(tags.contains("Tests &amp; &lt;Quotes&gt;"));
        assert!(tags.contains(r#"content="summary_large_image""#));
        assert!(tags.contains(r#"content="@nickblow""#));
        assert!(!tags.contains("<Quotes>"));
    }

    #[test]
    fn test_index_meta_tags() {
        let config = SiteConfig {
            title: "My Blog".to_string(),
            bio: "I write about things.".to_string(),
            ..SiteConfig::default()
        };
        let tags = index_meta_tags(&config);
        assert!(tags.contains(r#"og:title" content="My Blog""#));
        assert!(tags.contains("I write about things."));
    }
}

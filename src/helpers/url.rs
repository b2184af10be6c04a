//! URL helper functions

use crate::config::SiteConfig;

/// Social-preview image URL for an article, derived from the requesting host
///
/// # Examples
/// ```ignore
/// og_image_url("blog.example.com", "my-post")
/// // -> "https://blog.example.com/articles/my-post/og-image.png"
/// ```
pub fn og_image_url(host: &str, slug: &str) -> String {
    format!("https://{}/articles/{}/og-image.png", host, slug)
}

/// Generate a full URL including the configured domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/posts/my-post") // -> "https://example.com/posts/my-post"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_og_image_url() {
        assert_eq!(
            og_image_url("blog.example.com", "a-post"),
            "https://blog.example.com/articles/a-post/og-image.png"
        );
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/posts/a-post"),
            "https://example.com/posts/a-post"
        );
        assert_eq!(full_url_for(&config, ""), "https://example.com/");
    }
}

//! List registered articles

use anyhow::Result;

use crate::content::ContentRegistry;
use crate::helpers::url::full_url_for;
use crate::Blog;

/// Print all registered articles, newest first
pub fn run(blog: &Blog) -> Result<()> {
    let registry = ContentRegistry::scan(&blog.articles_dir)?;

    println!("Articles ({}):", registry.len());
    for post in registry.posts() {
        println!(
            "  {} - {} [{}]",
            post.date,
            post.title,
            full_url_for(&blog.config, &format!("posts/{}", post.slug))
        );
    }

    Ok(())
}

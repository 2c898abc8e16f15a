//! Static JSON export.
//!
//! Syncs once, writes the sorted collection as indented JSON, and prints a
//! short preview of the newest posts. Used to bake `blog-posts.json` into a
//! static site build.

use anyhow::{Context, Result};
use std::path::Path;

use crate::blog::Blog;
use crate::config::Config;
use crate::models::BlogPost;

/// Sync, collect and write. `output` overrides `[export].output`.
pub fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let blog = Blog::new(&config.repo);

    let outcome = blog.sync()?;
    println!("Repository {}: {}", config.repo.url, outcome);

    let posts = blog.posts()?;
    let path = output.unwrap_or(config.export.output.as_path());
    write_posts(&posts, path)?;

    println!("{} posts exported to {}", posts.len(), path.display());
    print!("{}", preview(&posts, config.export.preview));
    Ok(())
}

pub fn write_posts(posts: &[BlogPost], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(posts)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// `• title (category) - date` for the first `limit` posts.
pub fn preview(posts: &[BlogPost], limit: usize) -> String {
    if posts.is_empty() || limit == 0 {
        return String::new();
    }

    let mut out = String::from("\nLatest posts:\n");
    for post in posts.iter().take(limit) {
        out.push_str(&format!(
            "  • {} ({}) - {}\n",
            post.title, post.category, post.date
        ));
    }
    if posts.len() > limit {
        out.push_str(&format!("... and {} more\n", posts.len() - limit));
    }
    out
}

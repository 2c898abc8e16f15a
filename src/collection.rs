//! Collection assembly: walk, extract, sort.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};

use crate::extract::{extract_post, DateSource};
use crate::models::BlogPost;
use crate::walker::{walk_documents, Document};

/// Extract every eligible document under `root`, newest first.
///
/// A file that cannot be extracted is logged and skipped. Walk errors
/// (unreadable directories) abort the whole collection.
pub fn collect_posts(root: &Path, dates: &dyn DateSource) -> Result<Vec<BlogPost>> {
    let posts = assemble_posts(walk_documents(root)?, dates)?;
    debug!(count = posts.len(), root = %root.display(), "collected posts");
    Ok(posts)
}

/// Extract and sort an already-walked document sequence.
pub fn assemble_posts<I>(docs: I, dates: &dyn DateSource) -> Result<Vec<BlogPost>>
where
    I: IntoIterator<Item = Result<Document>>,
{
    let mut posts = Vec::new();

    for doc in docs {
        let doc = doc?;
        match extract_post(dates, &doc) {
            Ok(post) => posts.push(post),
            Err(err) => {
                let reason = format!("{:#}", err);
                warn!(path = %doc.relative, error = %reason, "skipping document");
            }
        }
    }

    sort_posts(&mut posts);
    Ok(posts)
}

/// Descending by `date`. Ties keep no particular order.
pub fn sort_posts(posts: &mut [BlogPost]) {
    posts.sort_unstable_by(|a, b| b.date.cmp(&a.date));
}

pub fn find_post<'a>(posts: &'a [BlogPost], path: &str) -> Option<&'a BlogPost> {
    posts.iter().find(|post| post.path == path)
}

//! Core data model.

use serde::{Deserialize, Serialize};

/// One Markdown document extracted from the working copy.
///
/// Built fresh on every walk; `path` is unique within one collection and is
/// the lookup key for `GET /api/blog-posts/{path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    /// `YYYY-MM-DD`; lexicographic order is chronological order.
    pub date: String,
    /// Relative to the repository root, `/`-separated.
    pub path: String,
    pub category: String,
    /// Raw file content, passed through unmodified.
    pub content: String,
}

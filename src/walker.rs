//! Document walker.
//!
//! Yields every eligible Markdown file under the working copy. Hidden
//! directories (including `.git`) are pruned without being descended into.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// An eligible Markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path on disk (root-joined).
    pub path: PathBuf,
    /// `/`-separated path relative to the repository root.
    pub relative: String,
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn is_markdown(name: &str) -> bool {
    let split = name.len().saturating_sub(3);
    name.get(split..)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(".md"))
}

/// Only the repository's own README is excluded; nested READMEs are posts.
pub fn is_root_readme(relative: &str) -> bool {
    relative == "README.md"
}

/// Walk `root` lazily. Fails up front if `root` is not a directory; errors
/// from inside the walk are yielded as items.
pub fn walk_documents(root: &Path) -> Result<impl Iterator<Item = Result<Document>>> {
    if !root.is_dir() {
        bail!("Working copy does not exist: {}", root.display());
    }

    let root = root.to_path_buf();
    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden_entry(entry));

    Ok(walker.filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                return Some(Err(anyhow::Error::new(err).context(format!(
                    "Failed to read directory under {}",
                    root.display()
                ))))
            }
        };

        if !entry.file_type().is_file() {
            return None;
        }

        let name = entry.file_name().to_string_lossy();
        if !is_markdown(&name) {
            return None;
        }

        let relative = relative_path(&root, entry.path());
        if is_root_readme(&relative) {
            return None;
        }

        Some(Ok(Document {
            path: entry.path().to_path_buf(),
            relative,
        }))
    }))
}

fn is_hidden_entry(entry: &DirEntry) -> bool {
    is_hidden(&entry.file_name().to_string_lossy())
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

//! The working copy and everything read from it, behind one lock.
//!
//! The clone directory is the only shared mutable state. Every sync and every
//! walk holds [`Blog`]'s guard, so a request never walks a tree that another
//! request is pulling into.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::collection::{collect_posts, find_post};
use crate::config::RepoConfig;
use crate::error::BlogError;
use crate::models::BlogPost;
use crate::sync::{RepoSync, SyncOutcome};

#[derive(Debug)]
pub struct Blog {
    repo: RepoSync,
    guard: Mutex<()>,
}

impl Blog {
    pub fn new(config: &RepoConfig) -> Self {
        Self {
            repo: RepoSync::new(config),
            guard: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        self.repo.local_path()
    }

    /// Synchronize only. Failure is returned to the caller.
    pub fn sync(&self) -> Result<SyncOutcome, BlogError> {
        let _guard = self.lock()?;
        let outcome = self.repo.sync()?;
        info!(%outcome, "repository synchronized");
        Ok(outcome)
    }

    /// Synchronize, then collect. A failed sync is logged and the existing
    /// working copy is read as-is.
    pub fn refresh(&self) -> Result<Vec<BlogPost>, BlogError> {
        let _guard = self.lock()?;
        match self.repo.sync() {
            Ok(outcome) => info!(%outcome, "repository synchronized"),
            Err(err) => warn!(error = %err, "sync failed, serving existing working copy"),
        }
        self.collect()
    }

    /// Collect without touching the remote.
    pub fn posts(&self) -> Result<Vec<BlogPost>, BlogError> {
        let _guard = self.lock()?;
        self.collect()
    }

    pub fn post(&self, path: &str) -> Result<Option<BlogPost>, BlogError> {
        let posts = self.posts()?;
        Ok(find_post(&posts, path).cloned())
    }

    fn collect(&self) -> Result<Vec<BlogPost>, BlogError> {
        collect_posts(self.repo.local_path(), &self.repo).map_err(BlogError::Walk)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, BlogError> {
        self.guard.lock().map_err(|_| BlogError::Lock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tests::upstream_repo;
    use std::fs;
    use tempfile::TempDir;

    fn config(url: &Path, local: &Path) -> RepoConfig {
        RepoConfig {
            url: url.to_string_lossy().to_string(),
            local_path: local.to_path_buf(),
            ..RepoConfig::default()
        }
    }

    #[test]
    fn test_refresh_clones_and_collects() {
        let upstream = upstream_repo();
        let work = TempDir::new().unwrap();
        let blog = Blog::new(&config(upstream.path(), &work.path().join("mirror")));

        let posts = blog.refresh().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].path, "go/slices.md");
        assert_eq!(posts[0].title, "Slices");
        assert_eq!(posts[0].category, "go");
    }

    #[test]
    fn test_concurrent_refreshes_are_serialized() {
        let upstream = upstream_repo();
        let work = TempDir::new().unwrap();
        // Mirror absent: exactly one caller clones, the rest see a full copy.
        let blog = Blog::new(&config(upstream.path(), &work.path().join("mirror")));

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| blog.refresh())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in results {
            let posts = result.unwrap();
            let paths: Vec<_> = posts.iter().map(|p| p.path.as_str()).collect();
            assert_eq!(paths, vec!["go/slices.md"]);
        }
        assert!(work.path().join("mirror/.git").exists());
    }

    #[test]
    fn test_refresh_tolerates_sync_failure() {
        let work = TempDir::new().unwrap();
        fs::write(work.path().join("local.md"), "# Local only\n").unwrap();
        // Not a git working copy: sync fails, the walk still runs.
        let blog = Blog::new(&config(Path::new("unused"), work.path()));

        let posts = blog.refresh().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Local only");
    }

    #[test]
    fn test_sync_failure_is_returned() {
        let work = TempDir::new().unwrap();
        let blog = Blog::new(&config(Path::new("unused"), work.path()));
        assert!(matches!(blog.sync(), Err(BlogError::Sync(_))));
    }

    #[test]
    fn test_walk_failure_is_returned() {
        let work = TempDir::new().unwrap();
        let blog = Blog::new(&config(Path::new("unused"), &work.path().join("absent")));
        assert!(matches!(blog.posts(), Err(BlogError::Walk(_))));
    }

    #[test]
    fn test_post_lookup() {
        let work = TempDir::new().unwrap();
        fs::create_dir_all(work.path().join("go")).unwrap();
        fs::write(work.path().join("go/slices.md"), "# Slices\n").unwrap();
        let blog = Blog::new(&config(Path::new("unused"), work.path()));

        assert_eq!(blog.post("go/slices.md").unwrap().unwrap().title, "Slices");
        assert!(blog.post("go/maps.md").unwrap().is_none());
    }
}

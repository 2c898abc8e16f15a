//! Error types for the synchronizer and the guarded blog façade.
//!
//! Per-file extraction failures never surface here; they are logged and the
//! file is skipped. Only structural failures (cannot sync, cannot walk) do.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to execute 'git {command}'. Is git installed?")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("{} exists but is not a git working copy", .0.display())]
    NotARepository(PathBuf),

    #[error("failed to prepare {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("repository sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("failed to walk working copy: {0:#}")]
    Walk(anyhow::Error),

    #[error("working copy lock poisoned by a panicked request")]
    Lock,
}

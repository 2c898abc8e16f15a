//! Repository synchronizer.
//!
//! Keeps the local working copy in step with the remote by shelling out to
//! the `git` binary:
//!
//! 1. Local path absent: `git clone` (optionally a single branch).
//! 2. Local path present: `git pull --ff-only` from the configured remote.
//! 3. HEAD is compared before and after the pull, so an already-current
//!    working copy reports [`SyncOutcome::UpToDate`] instead of an error.
//!
//! The synchronizer also answers per-file history queries for the extractor
//! through [`DateSource`].

use chrono::DateTime;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::config::RepoConfig;
use crate::error::SyncError;
use crate::extract::{DateSource, DATE_FORMAT};

/// What a [`RepoSync::sync`] call did to the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Updated { from: String, to: String },
    UpToDate,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::Cloned => write!(f, "cloned"),
            SyncOutcome::Updated { from, to } => {
                write!(f, "updated {}..{}", short_sha(from), short_sha(to))
            }
            SyncOutcome::UpToDate => write!(f, "already up to date"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RepoSync {
    url: String,
    local_path: PathBuf,
    remote: String,
    branch: Option<String>,
}

impl RepoSync {
    pub fn new(config: &RepoConfig) -> Self {
        Self {
            url: config.url.clone(),
            local_path: config.local_path.clone(),
            remote: config.remote.clone(),
            branch: config.branch.clone(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Clone if the working copy is missing, fast-forward it otherwise.
    pub fn sync(&self) -> Result<SyncOutcome, SyncError> {
        if !self.local_path.exists() {
            info!(url = %self.url, path = %self.local_path.display(), "cloning repository");
            self.clone_repo()?;
            return Ok(SyncOutcome::Cloned);
        }

        if !self.local_path.join(".git").exists() {
            return Err(SyncError::NotARepository(self.local_path.clone()));
        }

        info!(path = %self.local_path.display(), "updating working copy");
        let before = self.head_sha().ok();
        self.pull()?;
        let after = self.head_sha().ok();

        match (before, after) {
            (Some(from), Some(to)) if from != to => Ok(SyncOutcome::Updated { from, to }),
            (None, Some(to)) => Ok(SyncOutcome::Updated {
                from: String::new(),
                to,
            }),
            _ => Ok(SyncOutcome::UpToDate),
        }
    }

    fn clone_repo(&self) -> Result<(), SyncError> {
        if let Some(parent) = self.local_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| SyncError::Prepare {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut args: Vec<&OsStr> = vec![OsStr::new("clone")];
        if let Some(branch) = &self.branch {
            args.extend([
                OsStr::new("--branch"),
                OsStr::new(branch),
                OsStr::new("--single-branch"),
            ]);
        }
        args.push(OsStr::new(&self.url));
        args.push(self.local_path.as_os_str());

        run_git(None, &args)?;
        Ok(())
    }

    fn pull(&self) -> Result<(), SyncError> {
        let mut args: Vec<&OsStr> = vec![
            OsStr::new("pull"),
            OsStr::new("--ff-only"),
            OsStr::new(&self.remote),
        ];
        if let Some(branch) = &self.branch {
            args.push(OsStr::new(branch));
        }
        let stdout = run_git(Some(&self.local_path), &args)?;
        debug!(output = %stdout.trim(), "git pull");
        Ok(())
    }

    pub fn head_sha(&self) -> Result<String, SyncError> {
        let stdout = run_git(
            Some(&self.local_path),
            &[OsStr::new("rev-parse"), OsStr::new("HEAD")],
        )?;
        Ok(stdout.trim().to_string())
    }

    /// Committer date of the newest commit touching `relative_path`, as
    /// `YYYY-MM-DD` in the committer's own offset. `None` when the path has no
    /// history or git cannot answer.
    pub fn last_commit_date(&self, relative_path: &str) -> Option<String> {
        // Literal pathspec: `n[1].md` must not match `n1.md`.
        let pathspec = format!(":(literal){}", relative_path);
        let stdout = run_git(
            Some(&self.local_path),
            &[
                OsStr::new("log"),
                OsStr::new("-1"),
                OsStr::new("--format=%cI"),
                OsStr::new("--"),
                OsStr::new(&pathspec),
            ],
        )
        .ok()?;

        let stamp = stdout.trim();
        if stamp.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(stamp)
            .ok()
            .map(|when| when.format(DATE_FORMAT).to_string())
    }
}

impl DateSource for RepoSync {
    fn last_commit_date(&self, relative_path: &str) -> Option<String> {
        RepoSync::last_commit_date(self, relative_path)
    }
}

/// Run `git` with `args`, returning stdout on success.
fn run_git(dir: Option<&Path>, args: &[&OsStr]) -> Result<String, SyncError> {
    let command = args
        .first()
        .map(|a| a.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut cmd = Command::new("git");
    cmd.args(args);
    // Never block on a credential prompt; auth failures must fail the call.
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|source| SyncError::Spawn {
        command: command.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SyncError::Git {
            command,
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn short_sha(sha: &str) -> &str {
    if sha.is_empty() {
        return "(empty)";
    }
    &sha[..sha.len().min(8)]
}

//! TOML configuration.
//!
//! Every field has a default, so running without a config file mirrors the
//! public TIL repository into `./til-repo` and serves it on port 8080.
//!
//! ```toml
//! [repo]
//! url = "https://github.com/nathbns/til.git"
//! local_path = "./til-repo"
//! remote = "origin"
//!
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [export]
//! output = "../public/data/blog-posts.json"
//! preview = 5
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPO_URL: &str = "https://github.com/nathbns/til.git";
pub const DEFAULT_LOCAL_PATH: &str = "./til-repo";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_OUTPUT: &str = "../public/data/blog-posts.json";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub repo: RepoConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Remote repository and the working copy mirroring it.
#[derive(Debug, Deserialize, Clone)]
pub struct RepoConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Branch to clone and pull. `None` follows the remote's default branch.
    #[serde(default)]
    pub branch: Option<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            local_path: default_local_path(),
            remote: default_remote(),
            branch: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_REPO_URL.to_string()
}
fn default_local_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOCAL_PATH)
}
fn default_remote() -> String {
    "origin".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Number of posts listed in the console summary after an export.
    #[serde(default = "default_preview")]
    pub preview: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            preview: default_preview(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}
fn default_preview() -> usize {
    5
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.repo.url.trim().is_empty() {
            bail!("repo.url must not be empty");
        }
        if self.repo.local_path.as_os_str().is_empty() {
            bail!("repo.local_path must not be empty");
        }
        if self.repo.remote.trim().is_empty() {
            bail!("repo.remote must not be empty");
        }
        if let Some(branch) = &self.repo.branch {
            if branch.trim().is_empty() {
                bail!("repo.branch must not be empty when set");
            }
        }
        self.server
            .bind
            .parse::<SocketAddr>()
            .with_context(|| format!("server.bind is not a socket address: {}", self.server.bind))?;
        Ok(())
    }
}

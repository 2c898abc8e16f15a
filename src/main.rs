//! # TIL Blog CLI (`til-blog`)
//!
//! ## Usage
//!
//! ```bash
//! til-blog [--config ./til.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `til-blog serve` | Sync the working copy and start the HTTP API |
//! | `til-blog export` | Sync once and write the collection as JSON |
//! | `til-blog sync` | Clone or fast-forward the working copy |
//! | `til-blog list` | Print the collection from the current working copy |
//!
//! Without `--config`, the built-in defaults mirror
//! `https://github.com/nathbns/til.git` into `./til-repo`.
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use til_blog::blog::Blog;
use til_blog::config::{self, Config};
use til_blog::{export, server};

/// Mirror a git repository of Markdown notes and serve them as blog posts.
#[derive(Parser)]
#[command(name = "til-blog", version, about)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the repository, then serve the HTTP API.
    ///
    /// `GET /api/blog-posts` re-syncs on every call; a failed re-sync is
    /// logged and the existing working copy is served.
    Serve,

    /// Sync once and write every post as indented JSON.
    Export {
        /// Output file; overrides `[export].output`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Clone or fast-forward the working copy and report what changed.
    Sync,

    /// Print the collection from the working copy without syncing.
    List,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Export { output } => {
            tokio::task::spawn_blocking(move || export::run_export(&cfg, output.as_deref()))
                .await??;
        }
        Commands::Sync => {
            let blog = Blog::new(&cfg.repo);
            let outcome = tokio::task::spawn_blocking(move || blog.sync()).await??;
            println!("{}: {}", cfg.repo.local_path.display(), outcome);
        }
        Commands::List => {
            let blog = Blog::new(&cfg.repo);
            let posts = tokio::task::spawn_blocking(move || blog.posts()).await??;
            for post in &posts {
                println!(
                    "{}  {:<16} {:<40} {}",
                    post.date, post.category, post.path, post.title
                );
            }
            println!("{} posts", posts.len());
        }
    }

    Ok(())
}

//! # TIL Blog
//!
//! Mirrors a git repository of Markdown notes and exposes them as blog posts,
//! either over a small HTTP API or as a static JSON file.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌────────────┐
//! │  remote  │──▶│   sync   │──▶│  walker   │──▶│  extract   │
//! │   git    │   │ clone/ff │   │ *.md only │   │ title/date │
//! └──────────┘   └──────────┘   └───────────┘   └─────┬──────┘
//!                                                     │
//!                                  ┌──────────────────┤ collection
//!                                  ▼                  ▼
//!                             ┌──────────┐      ┌──────────┐
//!                             │  HTTP    │      │  export  │
//!                             │ (axum)   │      │  (JSON)  │
//!                             └──────────┘      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! til-blog serve                    # sync, then serve on :8080
//! til-blog export                   # write ../public/data/blog-posts.json
//! til-blog --config til.toml list   # print the collection
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with built-in defaults |
//! | [`error`] | Sync and collection error types |
//! | [`models`] | [`BlogPost`](models::BlogPost) |
//! | [`sync`] | Clone-or-pull of the working copy |
//! | [`walker`] | Eligible Markdown file discovery |
//! | [`extract`] | Title, category and date inference |
//! | [`collection`] | Walk + extract + sort |
//! | [`blog`] | Lock-guarded façade over the working copy |
//! | [`server`] | HTTP API |
//! | [`export`] | Static JSON export |

pub mod blog;
pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod server;
pub mod sync;
pub mod walker;

//! HTTP API over the blog collection.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/blog-posts` | Re-sync the working copy, then list every post (newest first) |
//! | `GET`  | `/api/blog-posts/{*path}` | One post by its exact relative path |
//! | `GET`  | `/health` | `{"status":"OK"}` |
//!
//! Successful responses are JSON. A lookup miss is `404` and a failed walk is
//! `500`, both with a plain-text body.
//!
//! # CORS
//!
//! Any origin; methods `GET`, `POST`, `OPTIONS`; header `Content-Type`.
//! The CORS layer answers every `OPTIONS` request itself with an empty `200`.

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::blog::Blog;
use crate::config::Config;
use crate::error::BlogError;
use crate::models::BlogPost;

/// Performs the startup sync, then serves until the process is terminated.
///
/// A failed startup sync is fatal; failed per-request syncs are only logged.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let blog = Arc::new(Blog::new(&config.repo));

    let startup = blog.clone();
    let outcome = tokio::task::spawn_blocking(move || startup.sync()).await??;
    println!("Repository {}: {}", config.repo.url, outcome);

    let app = build_router(blog);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "server listening");
    println!(
        "API available at http://{}/api/blog-posts",
        config.server.bind
    );
    axum::serve(listener, app).await?;

    Ok(())
}

/// Router with CORS and request tracing applied; shared by [`run_server`]
/// and the tests.
pub fn build_router(blog: Arc<Blog>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/blog-posts", get(handle_list_posts))
        .route("/api/blog-posts/", get(handle_empty_post_path))
        .route("/api/blog-posts/{*path}", get(handle_get_post))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(blog)
}

// ============ Error response ============

/// Plain-text error response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        error!(error = %err, "request failed");
        internal(format!("failed to load blog posts: {}", err))
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

/// Runs a blocking [`Blog`] call off the async executor.
async fn with_blog<T, F>(blog: Arc<Blog>, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Blog) -> Result<T, BlogError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(blog.as_ref()))
        .await
        .map_err(|e| internal(format!("worker task failed: {}", e)))?
        .map_err(AppError::from)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

// ============ GET /api/blog-posts ============

async fn handle_list_posts(State(blog): State<Arc<Blog>>) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts = with_blog(blog, Blog::refresh).await?;
    Ok(Json(posts))
}

// ============ GET /api/blog-posts/{*path} ============

/// `{*path}` needs at least one character, so the bare trailing slash is
/// routed here and answered like any other miss.
async fn handle_empty_post_path() -> AppError {
    not_found("post not found: ")
}

/// Lookup by exact relative path. Reads the working copy as it is; only the
/// list endpoint pulls.
async fn handle_get_post(
    State(blog): State<Arc<Blog>>,
    Path(path): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let lookup = path.clone();
    let post = with_blog(blog, move |blog| blog.post(&lookup)).await?;
    post.map(Json)
        .ok_or_else(|| not_found(format!("post not found: {}", path)))
}

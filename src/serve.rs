//! HTTP delivery of the gallery page.
//!
//! `GET /` (and `/index.html`) re-scans the gallery directory and renders the
//! page on every request, so a freshly dropped image or bundle shows up on the
//! next reload. The query string picks the display mode (`/?svg`). Every other
//! path is served straight from the gallery directory: full-size images,
//! thumbnails, bundles, the favicon.
//!
//! Requests share nothing but the read-only config; each scan runs on the
//! blocking pool.

use crate::config::GalleryConfig;
use crate::generate::{PageLinks, render_page};
use crate::scan::{self, ScanError};
use crate::types::DisplayMode;
use axum::{
    Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        error!(error = %self, "failed to render gallery");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Gallery unavailable: {self}"),
        )
            .into_response()
    }
}

/// Shared, read-only server state.
pub struct ServeState {
    pub dir: PathBuf,
    pub config: GalleryConfig,
}

/// Build the router: the rendered page plus static files from the gallery dir.
pub fn router(state: Arc<ServeState>) -> Router {
    let files = ServeDir::new(&state.dir);
    Router::new()
        .route("/", get(gallery_page))
        .route("/index.html", get(gallery_page))
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn gallery_page(
    State(state): State<Arc<ServeState>>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ServeError> {
    let mode = DisplayMode::from_query(query.as_deref(), &state.config.formats);
    let html = tokio::task::spawn_blocking(move || -> Result<String, ScanError> {
        let listing = scan::scan(&state.dir, &state.config)?;
        Ok(render_page(&listing, mode, &state.config, PageLinks::Query).into_string())
    })
    .await??;
    Ok(Html(html))
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn run(state: ServeState, host: &str, port: u16) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(
        "Serving {} at http://{}",
        state.dir.display(),
        listener.local_addr()?
    );
    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

//! HTTP API server
//!
//! Exposes the pipeline and thread directory over a small JSON API.

mod routes;

pub use routes::{build_router, AppState};

use eyre::{Context, Result};
use tracing::info;

use crate::config::ServerConfig;

/// Bind and serve the API until the process is stopped
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {addr}"))?;

    info!(%addr, "API server listening");

    let router = build_router(state);
    axum::serve(listener, router).await.context("Server error")?;

    Ok(())
}

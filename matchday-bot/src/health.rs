//! Liveness probe, independent of the domain engine.

use anyhow::{Context, Result};
use axum::{Router, routing::get};

async fn health() -> &'static str {
    "ok"
}

/// Serve `GET /health` on `addr` until the process exits.
pub async fn serve(addr: &str) -> Result<()> {
    let app = Router::new().route("/health", get(health));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind health listener on {addr}"))?;
    tracing::info!(%addr, "Health endpoint listening");
    axum::serve(listener, app).await?;
    Ok(())
}

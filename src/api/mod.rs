// ============================================================
// Layer 1b — HTTP API
// ============================================================
// Serves predictions over HTTP with axum:
//
//   POST /predict   {"user_id", "movie_title"} → predicted rating
//   GET  /metrics   Prometheus text exposition
//   GET  /health    liveness probe
//
// All request state lives in an AppContext built once, before
// the listener is bound, and handed to handlers via State.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppContext;

use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(ctx: AppContext, addr: SocketAddr) -> Result<()> {
    let app = create_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    tracing::info!("Serving predictions on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

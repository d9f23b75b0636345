//! Health endpoint.
//!
//! Serves `GET /health` with the hub statistics published by the engine
//! after each cycle.

use anyhow::Result;
use axum::{extract::State, routing::get, Json, Router};
use huddle_core::HubStats;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Build the HTTP router.
pub fn app(stats: watch::Receiver<HubStats>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(stats)
}

/// Serve the health endpoint on `addr` until the process exits.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn serve(addr: SocketAddr, stats: watch::Receiver<HubStats>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Health endpoint listening on http://{}/health", listener.local_addr()?);

    axum::serve(listener, app(stats)).await?;
    Ok(())
}

/// Health check handler.
async fn health_handler(State(stats): State<watch::Receiver<HubStats>>) -> Json<Value> {
    let stats = *stats.borrow();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": stats.rooms,
        "public_rooms": stats.public_rooms,
        "sessions": stats.sessions,
    }))
}

//! HTTP control server.
//!
//! Provides four endpoints:
//! - `GET /stats` - JSON snapshot of settings, pass state and counters
//! - `POST /scan` - Starts a full pass in the background
//! - `POST /scan/{collection_id}` - Scans one collection and returns its counts
//! - `PATCH /settings` - Applies a partial settings update
//!
//! Binds to loopback only. The server runs in the background and does not
//! block reconciliation.

mod handlers;
mod types;

use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;

use handlers::{scan_collection_handler, scan_handler, settings_handler, stats_handler};
pub use types::{ErrorResponse, ServerState};

/// Builds the control router around `state`.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/stats", get(stats_handler))
        .route("/scan", post(scan_handler))
        .route("/scan/{collection_id}", post(scan_collection_handler))
        .route("/settings", patch(settings_handler))
        .with_state(state)
}

/// Serves the control API on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: ServerState) -> Result<(), anyhow::Error> {
    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))
}

/// Creates and starts the control server on `127.0.0.1:port`.
pub async fn start_status_server(port: u16, state: ServerState) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind status server to port {}: {}", port, e))?;

    log::info!("Control server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Stats: GET http://127.0.0.1:{}/stats", port);
    log::info!("  - Scan: POST http://127.0.0.1:{}/scan[/<collection>]", port);
    log::info!("  - Settings: PATCH http://127.0.0.1:{}/settings", port);

    serve(listener, state).await
}

#[cfg(test)]
mod tests;

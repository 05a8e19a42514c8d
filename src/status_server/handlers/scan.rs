//! Scan trigger handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;

use super::super::types::{ErrorResponse, ServerState};

/// Starts a full pass in the background.
///
/// 202 when the pass was started, 409 when one is already running. The
/// check and the start are not atomic; a request that loses the race still
/// gets 202 and its pass is skipped as usual.
pub async fn scan_handler(State(state): State<ServerState>) -> Response {
    if state.service.is_running() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("a reconciliation pass is already running")),
        )
            .into_response();
    }

    let service = state.service.clone();
    tokio::spawn(async move {
        service.scan_now().await;
    });
    StatusCode::ACCEPTED.into_response()
}

/// Scans one collection and answers with its counts.
pub async fn scan_collection_handler(
    State(state): State<ServerState>,
    Path(collection_id): Path<String>,
) -> Response {
    match state.service.scan_collection(&collection_id).await {
        Ok(Some(report)) => Json(report).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "unknown collection {}",
                collection_id
            ))),
        )
            .into_response(),
        Err(e) => {
            error!("Forced scan of collection {} failed: {}", collection_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

//! Settings handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{ErrorResponse, ServerState};
use crate::config::ConfigPatch;

/// Applies a partial settings update and answers with the new stats.
///
/// Malformed bodies and values that fail validation both answer 400 and
/// leave the installed settings unchanged.
pub async fn settings_handler(
    State(state): State<ServerState>,
    body: Result<Json<ConfigPatch>, JsonRejection>,
) -> Response {
    let Json(patch) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(rejection.body_text())),
            )
                .into_response();
        }
    };

    match state.service.update_settings(&patch) {
        Ok(_) => Json(state.service.get_stats()).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

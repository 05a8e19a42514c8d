//! Stats handler.

use axum::{extract::State, Json};

use super::super::types::ServerState;
use crate::app::StatsSnapshot;

pub async fn stats_handler(State(state): State<ServerState>) -> Json<StatsSnapshot> {
    Json(state.service.get_stats())
}

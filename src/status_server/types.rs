//! Control server data structures.

use serde::Serialize;

use crate::app::AutoTagService;

/// Shared state for the control server
#[derive(Clone)]
pub struct ServerState {
    pub service: AutoTagService,
}

impl ServerState {
    pub fn new(service: AutoTagService) -> Self {
        ServerState { service }
    }
}

/// JSON body for every non-2xx answer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
        }
    }
}

pub mod analytics;
pub mod handlers;
pub mod history;
pub mod middleware;
pub mod routes;
pub mod sessions;

pub use routes::create_router;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use bibliofind_core::SearchSessionController;

use crate::state::AppState;

/// Error response body shared by all handlers.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Look up a session by id, mapping a miss to 404.
pub fn session_or_404(
    state: &AppState,
    id: &Uuid,
) -> Result<Arc<SearchSessionController>, ApiError> {
    state.session(id).ok_or_else(|| {
        error_response(StatusCode::NOT_FOUND, format!("Session not found: {}", id))
    })
}

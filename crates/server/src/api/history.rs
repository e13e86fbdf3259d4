//! Search history API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use bibliofind_core::HistoryEntry;

use super::{error_response, session_or_404, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    /// True when persistence failed and history is in-memory only.
    pub degraded: bool,
}

/// Query parameters for deleting history
#[derive(Debug, Deserialize)]
pub struct DeleteHistoryParams {
    /// Remove this query only; omitted means clear everything
    pub query: Option<String>,
}

/// List the session's search history, most recent first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = session_or_404(&state, &id)?;
    Ok(Json(HistoryResponse {
        entries: session.history(),
        degraded: session.history_degraded(),
    }))
}

/// Remove one entry or clear the whole history
pub async fn delete_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteHistoryParams>,
) -> Result<StatusCode, ApiError> {
    let session = session_or_404(&state, &id)?;
    match params.query {
        Some(query) => {
            if session.remove_history(&query) {
                Ok(StatusCode::NO_CONTENT)
            } else {
                Err(error_response(
                    StatusCode::NOT_FOUND,
                    format!("History entry not found: {}", query),
                ))
            }
        }
        None => {
            session.clear_history();
            Ok(StatusCode::NO_CONTENT)
        }
    }
}

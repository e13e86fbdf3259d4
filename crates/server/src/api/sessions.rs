//! Session API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use bibliofind_core::{SearchFilters, SessionSnapshot, Suggestion};

use super::{error_response, session_or_404, ApiError};
use crate::state::AppState;

/// Maximum allowed suggestion limit
const MAX_SUGGESTION_LIMIT: usize = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<Uuid>,
}

/// Request body for input and search
#[derive(Debug, Deserialize)]
pub struct QueryTextBody {
    pub text: String,
}

/// Query parameters for suggestions
#[derive(Debug, Deserialize)]
pub struct SuggestionsParams {
    /// Prefix to match; empty means everything
    pub prefix: Option<String>,
    /// Maximum suggestions to return
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new search session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let id = state.create_session();
    (StatusCode::CREATED, Json(CreateSessionResponse { id }))
}

/// List live session ids
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<ListSessionsResponse> {
    Json(ListSessionsResponse {
        sessions: state.session_ids(),
    })
}

/// Close a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error_response(
            StatusCode::NOT_FOUND,
            format!("Session not found: {}", id),
        ))
    }
}

/// Feed an input change into the session's debouncer.
///
/// Returns the immediate snapshot; resolution happens asynchronously once
/// the input settles. Poll state or subscribe for the outcome.
pub async fn submit_input(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<QueryTextBody>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let session = session_or_404(&state, &id)?;
    session.submit_input(&body.text);
    Ok((StatusCode::ACCEPTED, Json(session.snapshot())))
}

/// Resolve a query immediately, bypassing the debouncer.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<QueryTextBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = session_or_404(&state, &id)?;
    let snapshot = session.execute(&body.text).await;
    Ok(Json(snapshot))
}

/// Current session snapshot
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = session_or_404(&state, &id)?;
    Ok(Json(session.snapshot()))
}

/// Replace the session's structured filters
pub async fn set_filters(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(filters): Json<SearchFilters>,
) -> Result<StatusCode, ApiError> {
    let session = session_or_404(&state, &id)?;
    session.set_filters(filters);
    Ok(StatusCode::NO_CONTENT)
}

/// Blended suggestions for a prefix
pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<SuggestionsParams>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let session = session_or_404(&state, &id)?;
    let prefix = params.prefix.unwrap_or_default();
    let limit = params.limit.map(|l| l.clamp(1, MAX_SUGGESTION_LIMIT));
    Ok(Json(SuggestionsResponse {
        suggestions: session.suggestions(&prefix, limit),
    }))
}

//! Analytics API handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use bibliofind_core::QueryCount;

use super::{session_or_404, ApiError};
use crate::state::AppState;

/// Maximum allowed limit for analytics queries
const MAX_LIMIT: usize = 100;

/// Default limit for analytics queries
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    /// Window size in hours; omitted means the configured default
    pub hours: Option<u64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub queries: Vec<QueryCount>,
}

/// Most frequent queries over the session's lifetime
pub async fn get_popular(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<PopularParams>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let session = session_or_404(&state, &id)?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Ok(Json(AnalyticsResponse {
        queries: session.popular(limit),
    }))
}

/// Most frequent queries inside a sliding recency window
pub async fn get_trending(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let session = session_or_404(&state, &id)?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let window = params.hours.map(|h| Duration::from_secs(h * 3600));
    Ok(Json(AnalyticsResponse {
        queries: session.trending(window, limit),
    }))
}

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{analytics, handlers, history, sessions};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Sessions
        .route("/sessions", post(sessions::create_session))
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/{id}", delete(sessions::delete_session))
        .route("/sessions/{id}/input", post(sessions::submit_input))
        .route("/sessions/{id}/search", post(sessions::search))
        .route("/sessions/{id}/state", get(sessions::get_state))
        .route("/sessions/{id}/filters", put(sessions::set_filters))
        .route("/sessions/{id}/suggestions", get(sessions::get_suggestions))
        // History
        .route("/sessions/{id}/history", get(history::get_history))
        .route("/sessions/{id}/history", delete(history::delete_history))
        // Analytics
        .route(
            "/sessions/{id}/analytics/popular",
            get(analytics::get_popular),
        )
        .route(
            "/sessions/{id}/analytics/trending",
            get(analytics::get_trending),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::get_metrics))
        .layer(middleware::from_fn(super::middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

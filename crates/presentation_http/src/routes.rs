//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Default upper bound on a JSON request body
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Create the router with the default body limit
pub fn create_router(state: AppState) -> Router {
    create_router_with_limit(state, DEFAULT_BODY_LIMIT)
}

/// Create the router with all routes and middleware
pub fn create_router_with_limit(state: AppState, body_limit: usize) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Samples (v1)
        .route("/v1/locations", post(handlers::location::submit_sample))
        // Trip queries (v1)
        .route("/v1/trips/{id}", get(handlers::trips::get_trip))
        .route(
            "/v1/subjects/{subject_id}/trips",
            get(handlers::trips::list_subject_trips),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new())
        .with_state(state)
}

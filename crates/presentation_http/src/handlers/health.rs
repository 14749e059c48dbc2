//! Health check handlers

use application::ports::TripStorePort;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub zones: ZoneStatus,
    pub store: StoreStatus,
}

/// Zone reference set summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneStatus {
    pub count: usize,
}

/// Trip store reachability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_trips: Option<u64>,
}

/// Readiness check - is the server ready to accept samples?
///
/// An empty zone set does not make the server unready; every sample is
/// simply outside.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let open_trips = match state.trip_store.count_open().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "Trip store unreachable");
            None
        },
    };

    let ready = open_trips.is_some();
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            zones: ZoneStatus {
                count: state.zones.len(),
            },
            store: StoreStatus {
                healthy: ready,
                open_trips,
            },
        }),
    )
}

//! Trip query handlers

use application::ports::TripStorePort;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use domain::{SubjectId, TripId, TripRecord};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 500;

/// Query parameters for listing trips
#[derive(Debug, Default, Deserialize)]
pub struct ListTripsQuery {
    pub limit: Option<u32>,
}

impl ListTripsQuery {
    fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Trips of one subject, newest first
#[derive(Debug, Serialize)]
pub struct TripListResponse {
    pub subject_id: String,
    pub trips: Vec<TripRecord>,
}

/// List the most recent trips of a subject
pub async fn list_subject_trips(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Query(query): Query<ListTripsQuery>,
) -> Result<Json<TripListResponse>, ApiError> {
    let subject_id = SubjectId::new(subject_id)?;
    let trips = state
        .trip_store
        .list_by_subject(&subject_id, query.effective_limit())
        .await?;

    Ok(Json(TripListResponse {
        subject_id: subject_id.to_string(),
        trips,
    }))
}

/// Fetch a single trip by id
pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripRecord>, ApiError> {
    let trip_id =
        TripId::parse(&id).map_err(|_| ApiError::BadRequest(format!("invalid trip id: {id}")))?;
    state
        .trip_store
        .get(&trip_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("trip {trip_id}")))
}

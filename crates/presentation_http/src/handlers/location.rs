//! Location sample handlers
//!
//! Each posted sample runs through the transition engine; the response is
//! the resulting outcome.

use application::services::Outcome;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use domain::{Coordinate, LocationSample, SubjectId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{error::ApiError, state::AppState};

/// Request body for a location sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSampleRequest {
    pub subject_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Defaults to the time the request was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl LocationSampleRequest {
    /// Validate and convert into a domain sample
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for an unusable subject id or coordinate
    pub fn into_sample(self, received_at: DateTime<Utc>) -> Result<LocationSample, ApiError> {
        let subject_id = SubjectId::new(self.subject_id)?;
        let coordinate = Coordinate::new(self.latitude, self.longitude)?;
        Ok(LocationSample::new(
            subject_id,
            coordinate,
            self.observed_at.unwrap_or(received_at),
        ))
    }
}

/// Submit a location sample
#[instrument(skip(state, body))]
pub async fn submit_sample(
    State(state): State<AppState>,
    body: Result<Json<LocationSampleRequest>, JsonRejection>,
) -> Result<Json<Outcome>, ApiError> {
    let Json(request) = body?;
    let sample = request.into_sample(Utc::now())?;

    let outcome = state.engine.process_sample(&sample).await?;
    info!(
        subject_id = %sample.subject_id,
        outcome = outcome.label(),
        "Sample processed"
    );
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn request(subject: &str, lat: f64, lon: f64) -> LocationSampleRequest {
        LocationSampleRequest {
            subject_id: subject.to_string(),
            latitude: lat,
            longitude: lon,
            observed_at: None,
        }
    }

    #[test]
    fn missing_observed_at_uses_receipt_time() {
        let received = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let sample = request("KA01AB1234", 12.9, 77.6)
            .into_sample(received)
            .unwrap();
        assert_eq!(sample.observed_at, received);
        assert_eq!(sample.subject_id.as_str(), "KA01AB1234");
    }

    #[test]
    fn explicit_observed_at_is_kept() {
        let observed = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
        let mut req = request("s1", 1.0, 2.0);
        req.observed_at = Some(observed);
        let sample = req.into_sample(Utc::now()).unwrap();
        assert_eq!(sample.observed_at, observed);
    }

    #[test]
    fn blank_subject_is_rejected() {
        let err = request("   ", 1.0, 2.0).into_sample(Utc::now()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let err = request("s1", f64::NAN, 2.0)
            .into_sample(Utc::now())
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn request_parses_rfc3339_timestamp() {
        let json = r#"{"subject_id":"s1","latitude":1.5,"longitude":2.5,"observed_at":"2024-05-01T07:00:00Z"}"#;
        let req: LocationSampleRequest = serde_json::from_str(json).unwrap();
        assert!(req.observed_at.is_some());
    }
}

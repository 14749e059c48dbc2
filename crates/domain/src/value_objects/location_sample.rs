//! A single observed position of a subject

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, SubjectId};

/// One location update for a subject
///
/// `observed_at` is recorded on the trip but never used to reorder or
/// reject samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub subject_id: SubjectId,
    pub coordinate: Coordinate,
    pub observed_at: DateTime<Utc>,
}

impl LocationSample {
    /// Create a sample
    #[must_use]
    pub const fn new(
        subject_id: SubjectId,
        coordinate: Coordinate,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject_id,
            coordinate,
            observed_at,
        }
    }

    /// Create a sample observed now
    #[must_use]
    pub fn now(subject_id: SubjectId, coordinate: Coordinate) -> Self {
        Self::new(subject_id, coordinate, Utc::now())
    }
}

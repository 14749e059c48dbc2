//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinate components were not finite numbers
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Subject identifier was empty or too long
    #[error("Invalid subject id: {0}")]
    InvalidSubjectId(String),

    /// Fare rate was negative or not a number
    #[error("Invalid fare rate: {0}")]
    InvalidFareRate(String),

    /// A closed trip was asked to close again
    #[error("Trip {trip_id} is already closed")]
    TripAlreadyClosed { trip_id: String },

    /// An open trip lacks the entry coordinate required to finalize it
    #[error("Trip {trip_id} has no usable entry coordinate")]
    MissingEntryCoordinate { trip_id: String },

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_creates_correct_error() {
        let err = DomainError::not_found("Trip", "123");
        match err {
            DomainError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "Trip");
                assert_eq!(id, "123");
            },
            _ => unreachable!("Expected NotFound error"),
        }
    }

    #[test]
    fn not_found_error_message_is_correct() {
        let err = DomainError::not_found("Trip", "123");
        assert_eq!(err.to_string(), "Trip not found: 123");
    }

    #[test]
    fn missing_entry_coordinate_message() {
        let err = DomainError::MissingEntryCoordinate {
            trip_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Trip abc has no usable entry coordinate");
    }

    #[test]
    fn trip_already_closed_message() {
        let err = DomainError::TripAlreadyClosed {
            trip_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Trip abc is already closed");
    }

    #[test]
    fn invalid_coordinate_message() {
        let err = DomainError::InvalidCoordinate("NaN".to_string());
        assert_eq!(err.to_string(), "Invalid coordinate: NaN");
    }
}

//! Maps error types

use thiserror::Error;

/// Errors that can occur when talking to the Maps web services
#[derive(Debug, Error)]
pub enum MapsError {
    /// No API key configured
    #[error("Maps API key is not configured")]
    MissingApiKey,

    /// Coordinate was not a finite number pair
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Connection to the service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Non-success HTTP status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The service rejected the request (quota, key, server error)
    #[error("API error {status}: {message}")]
    ApiError {
        /// Top-level status code
        status: String,
        /// Error message supplied by the service, if any
        message: String,
    },

    /// Reverse geocoding found no candidates
    #[error("No geocoding results")]
    NoResult,

    /// The first candidate had no formatted address
    #[error("Geocoding result has no formatted address")]
    MalformedResult,

    /// The distance matrix carried no usable route
    #[error("Route unavailable (status: {status}, element status: {element_status})")]
    RouteUnavailable {
        /// Top-level status code
        status: String,
        /// Status of the single origin/destination element
        element_status: String,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl MapsError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout { .. }
        )
    }
}

//! Reverse geocoding port
//!
//! Turns a coordinate into a human-readable location label.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Why a coordinate could not be resolved to a label
///
/// Every variant is non-fatal to sample processing: the caller treats the
/// label as absent, which never counts as being inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodingError {
    #[error("No geocoding result")]
    NoResult,

    #[error("Geocoding result has no usable label")]
    MalformedResult,

    #[error("Geocoding provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Port for reverse geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeoResolverPort: Send + Sync {
    /// Resolve the label of the first candidate, trimmed
    async fn resolve_label(&self, coordinate: &Coordinate) -> Result<String, GeocodingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeoResolverPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeoResolverPort>();
    }

    #[test]
    fn error_messages() {
        assert_eq!(GeocodingError::NoResult.to_string(), "No geocoding result");
        assert_eq!(
            GeocodingError::ProviderUnavailable("missing key".to_string()).to_string(),
            "Geocoding provider unavailable: missing key"
        );
    }

    #[tokio::test]
    async fn mock_resolves_label() {
        let mut mock = MockGeoResolverPort::new();
        mock.expect_resolve_label()
            .returning(|_| Ok("Plaza A".to_string()));

        let label = mock
            .resolve_label(&Coordinate::new_unchecked(1.0, 2.0))
            .await
            .unwrap();
        assert_eq!(label, "Plaza A");
    }
}

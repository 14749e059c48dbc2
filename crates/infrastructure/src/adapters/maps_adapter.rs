//! Maps adapter - Implements GeoResolverPort and DistanceEstimatorPort
//! using integration_maps

use std::sync::Arc;

use application::ports::{
    DistanceEstimatorPort, GeoResolverPort, GeocodingError, RoutingError,
};
use async_trait::async_trait;
use domain::Coordinate;
use integration_maps::{GoogleMapsClient, MapsClient, MapsConfig, MapsError};
use tracing::{debug, instrument, warn};

const MISSING_CLIENT: &str = "maps client not configured";

/// Adapter for reverse geocoding and driving distances
///
/// Without a client every call reports the provider as unavailable, which
/// the engine treats as "outside any zone" and "unknown distance".
pub struct MapsAdapter {
    client: Option<Arc<dyn MapsClient>>,
}

impl std::fmt::Debug for MapsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsAdapter")
            .field("configured", &self.client.is_some())
            .finish()
    }
}

impl MapsAdapter {
    /// Build from configuration
    ///
    /// A missing API key or an HTTP client that fails to build leaves the
    /// adapter unconfigured rather than failing startup.
    pub fn new(config: &MapsConfig) -> Self {
        match GoogleMapsClient::new(config) {
            Ok(client) => {
                debug!(base_url = %config.base_url, "Maps client configured");
                Self::with_client(Arc::new(client))
            },
            Err(e) => {
                warn!(error = %e, "Maps client unavailable; geocoding and routing disabled");
                Self::unconfigured()
            },
        }
    }

    /// Wrap an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn MapsClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Adapter whose every call fails with `ProviderUnavailable`
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { client: None }
    }

    /// Whether a provider client is present
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn map_geocoding_error(err: MapsError) -> GeocodingError {
        match err {
            MapsError::NoResult => GeocodingError::NoResult,
            MapsError::MalformedResult => GeocodingError::MalformedResult,
            other => GeocodingError::ProviderUnavailable(other.to_string()),
        }
    }

    fn map_routing_error(err: MapsError) -> RoutingError {
        match err {
            MapsError::InvalidCoordinate(msg) => RoutingError::InvalidInput(msg),
            MapsError::RouteUnavailable {
                status,
                element_status,
            } => RoutingError::RouteUnavailable {
                status,
                element_status,
            },
            // A geocoding-only variant here means the reply made no sense
            MapsError::NoResult | MapsError::MalformedResult => RoutingError::RouteUnavailable {
                status: "UNKNOWN".to_string(),
                element_status: "MISSING".to_string(),
            },
            other => RoutingError::ProviderUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl GeoResolverPort for MapsAdapter {
    #[instrument(skip(self), fields(coordinate = %coordinate))]
    async fn resolve_label(&self, coordinate: &Coordinate) -> Result<String, GeocodingError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| GeocodingError::ProviderUnavailable(MISSING_CLIENT.to_string()))?;

        client
            .reverse_geocode(coordinate)
            .await
            .map_err(Self::map_geocoding_error)
    }
}

#[async_trait]
impl DistanceEstimatorPort for MapsAdapter {
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    async fn estimate_distance_km(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<f64, RoutingError> {
        for coordinate in [origin, destination] {
            if !coordinate.is_well_formed() {
                return Err(RoutingError::InvalidInput(format!(
                    "coordinate is not finite: {coordinate}"
                )));
            }
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| RoutingError::ProviderUnavailable(MISSING_CLIENT.to_string()))?;

        client
            .driving_distance_km(origin, destination)
            .await
            .map_err(Self::map_routing_error)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    /// Scripted client returning queued replies
    #[derive(Default)]
    struct FakeMapsClient {
        labels: Mutex<Vec<Result<String, MapsError>>>,
        distances: Mutex<Vec<Result<f64, MapsError>>>,
    }

    #[async_trait]
    impl MapsClient for FakeMapsClient {
        async fn reverse_geocode(&self, _coordinate: &Coordinate) -> Result<String, MapsError> {
            self.labels.lock().remove(0)
        }

        async fn driving_distance_km(
            &self,
            _origin: &Coordinate,
            _destination: &Coordinate,
        ) -> Result<f64, MapsError> {
            self.distances.lock().remove(0)
        }
    }

    fn adapter_with(
        labels: Vec<Result<String, MapsError>>,
        distances: Vec<Result<f64, MapsError>>,
    ) -> MapsAdapter {
        MapsAdapter::with_client(Arc::new(FakeMapsClient {
            labels: Mutex::new(labels),
            distances: Mutex::new(distances),
        }))
    }

    fn point() -> Coordinate {
        Coordinate::new_unchecked(10.0, 20.0)
    }

    #[test]
    fn missing_api_key_leaves_adapter_unconfigured() {
        let adapter = MapsAdapter::new(&MapsConfig::default());
        assert!(!adapter.is_configured());
    }

    #[test]
    fn api_key_configures_adapter() {
        let adapter = MapsAdapter::new(&MapsConfig::with_api_key("key"));
        assert!(adapter.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_adapter_reports_provider_unavailable() {
        let adapter = MapsAdapter::unconfigured();
        assert!(matches!(
            adapter.resolve_label(&point()).await,
            Err(GeocodingError::ProviderUnavailable(_))
        ));
        assert!(matches!(
            adapter.estimate_distance_km(&point(), &point()).await,
            Err(RoutingError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn geocoding_errors_are_mapped() {
        let adapter = adapter_with(
            vec![
                Ok("Plaza A".to_string()),
                Err(MapsError::NoResult),
                Err(MapsError::MalformedResult),
                Err(MapsError::Timeout { timeout_secs: 10 }),
            ],
            vec![],
        );

        assert_eq!(adapter.resolve_label(&point()).await.unwrap(), "Plaza A");
        assert_eq!(
            adapter.resolve_label(&point()).await,
            Err(GeocodingError::NoResult)
        );
        assert_eq!(
            adapter.resolve_label(&point()).await,
            Err(GeocodingError::MalformedResult)
        );
        assert!(matches!(
            adapter.resolve_label(&point()).await,
            Err(GeocodingError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn routing_errors_are_mapped() {
        let adapter = adapter_with(
            vec![],
            vec![
                Ok(12.34),
                Err(MapsError::RouteUnavailable {
                    status: "OK".to_string(),
                    element_status: "ZERO_RESULTS".to_string(),
                }),
                Err(MapsError::ConnectionFailed("refused".to_string())),
            ],
        );

        let d = adapter.estimate_distance_km(&point(), &point()).await;
        assert!((d.unwrap() - 12.34).abs() < f64::EPSILON);
        assert_eq!(
            adapter.estimate_distance_km(&point(), &point()).await,
            Err(RoutingError::RouteUnavailable {
                status: "OK".to_string(),
                element_status: "ZERO_RESULTS".to_string(),
            })
        );
        assert!(matches!(
            adapter.estimate_distance_km(&point(), &point()).await,
            Err(RoutingError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn non_finite_coordinates_are_invalid_input() {
        let adapter = MapsAdapter::unconfigured();
        let bad = Coordinate::new_unchecked(f64::NAN, 20.0);
        assert!(matches!(
            adapter.estimate_distance_km(&bad, &point()).await,
            Err(RoutingError::InvalidInput(_))
        ));
    }
}

//! Driving distance port

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Why no driving distance is available
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A coordinate was not a well-formed pair
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider answered but without a usable route
    #[error("Route unavailable (status: {status}, element status: {element_status})")]
    RouteUnavailable {
        status: String,
        element_status: String,
    },

    #[error("Routing provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Port for driving distance estimation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DistanceEstimatorPort: Send + Sync {
    /// Driving distance in kilometres, rounded to two decimals
    async fn estimate_distance_km(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<f64, RoutingError>;
}

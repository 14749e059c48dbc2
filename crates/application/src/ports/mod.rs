//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod distance_estimator_port;
mod geo_resolver_port;
mod notification_port;
mod recipient_directory_port;
mod trip_store_port;

#[cfg(test)]
pub use distance_estimator_port::MockDistanceEstimatorPort;
pub use distance_estimator_port::{DistanceEstimatorPort, RoutingError};
#[cfg(test)]
pub use geo_resolver_port::MockGeoResolverPort;
pub use geo_resolver_port::{GeoResolverPort, GeocodingError};
#[cfg(test)]
pub use notification_port::MockNotificationPort;
pub use notification_port::{BillStop, NotificationError, NotificationPort, TollBill};
#[cfg(test)]
pub use recipient_directory_port::MockRecipientDirectoryPort;
pub use recipient_directory_port::RecipientDirectoryPort;
#[cfg(test)]
pub use trip_store_port::MockTripStorePort;
pub use trip_store_port::TripStorePort;

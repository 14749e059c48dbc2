//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: SQLite trip storage,
//! Google Maps geocoding and routing, SMTP bill delivery. Also owns
//! configuration loading, zone data loading and engine wiring.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod persistence;
pub mod telemetry;
pub mod zones;

pub use adapters::*;
pub use bootstrap::{AppComponents, BootstrapError};
pub use config::{AppConfig, DatabaseConfig, ServerConfig, TelemetryAppConfig};
pub use persistence::{ConnectionPool, DatabaseError, SqliteTripStore, create_pool};
pub use telemetry::{init_tracing, verbosity_filter};
pub use zones::{ZoneLoadError, ZoneLoadSummary, load_zones, load_zones_or_empty};

//! Google Maps Platform integration for Tollgate
//!
//! Provides reverse geocoding (coordinate to formatted address) and driving
//! distances from the Distance Matrix service.
//!
//! # Architecture
//!
//! [`MapsClient`] defines the interface, implemented by [`GoogleMapsClient`].
//! Provider status codes are interpreted here and surface as [`MapsError`]
//! variants, so adapters only translate errors into their own vocabulary.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::Coordinate;
//! use integration_maps::{GoogleMapsClient, MapsClient, MapsConfig};
//!
//! let client = GoogleMapsClient::new(&MapsConfig::with_api_key("key"))?;
//! let label = client
//!     .reverse_geocode(&Coordinate::new(12.9716, 77.5946)?)
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GoogleMapsClient, MapsClient};
pub use config::MapsConfig;
pub use error::MapsError;

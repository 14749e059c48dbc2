//! Application layer - Use cases and orchestration
//!
//! Contains the toll-zone transition engine and the ports through which it
//! reaches geocoding, routing, storage and notification adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

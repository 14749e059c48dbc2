//! Domain layer for Tollgate
//!
//! Contains the toll-zone vocabulary: coordinates, subjects, the zone
//! reference set, fare schedule and the trip record lifecycle.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;

//! Persistence module
//!
//! SQLite-based storage for toll trips.

pub mod connection;
mod error;
pub mod migrations;
pub mod trip_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use trip_store::SqliteTripStore;

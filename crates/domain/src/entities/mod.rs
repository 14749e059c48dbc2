//! Domain entities - Objects with identity and lifecycle

mod trip_record;

pub use trip_record::{TripEntry, TripExit, TripRecord, ZoneState};

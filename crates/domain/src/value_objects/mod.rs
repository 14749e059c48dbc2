//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod fare_schedule;
mod location_sample;
mod subject_id;
mod trip_id;
mod zone_reference_set;

pub use coordinate::Coordinate;
pub use fare_schedule::{FareSchedule, round_to_cents};
pub use location_sample::LocationSample;
pub use subject_id::SubjectId;
pub use trip_id::TripId;
pub use zone_reference_set::{ZoneMatch, ZoneReferenceSet};

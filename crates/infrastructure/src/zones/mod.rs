//! Zone reference data loading

mod loader;

pub use loader::{ZoneLoadError, ZoneLoadSummary, load_zones, load_zones_from_reader, load_zones_or_empty};

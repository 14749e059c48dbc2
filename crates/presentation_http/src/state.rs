//! Application state shared across handlers

use std::sync::Arc;

use application::{ports::TripStorePort, services::TransitionEngine};
use domain::ZoneReferenceSet;
use infrastructure::AppComponents;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Engine that turns samples into trip transitions
    pub engine: Arc<TransitionEngine>,
    /// Zone reference set, for readiness reporting
    pub zones: Arc<ZoneReferenceSet>,
    /// Trip store, for queries and readiness probing
    pub trip_store: Arc<dyn TripStorePort>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("zones", &self.zones.len())
            .finish_non_exhaustive()
    }
}

impl From<AppComponents> for AppState {
    fn from(components: AppComponents) -> Self {
        Self {
            engine: components.engine,
            zones: components.zones,
            trip_store: components.trip_store,
        }
    }
}

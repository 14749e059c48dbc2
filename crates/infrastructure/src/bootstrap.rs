//! Wiring of configuration into a ready transition engine

use std::sync::Arc;

use application::{
    ports::{DistanceEstimatorPort, GeoResolverPort, TripStorePort},
    services::{EngineConfig, TransitionEngine},
};
use domain::{DomainError, ZoneReferenceSet};
use thiserror::Error;
use tracing::info;

use crate::{
    adapters::{MapsAdapter, SmtpNotificationAdapter, StaticRecipientDirectory},
    config::AppConfig,
    persistence::{DatabaseError, SqliteTripStore, create_pool},
    zones::load_zones_or_empty,
};

/// Errors that prevent startup
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid fare configuration: {0}")]
    Fare(#[from] DomainError),

    #[error("Database unavailable: {0}")]
    Database(#[from] DatabaseError),
}

/// Everything a front end needs to serve samples
#[derive(Clone)]
pub struct AppComponents {
    pub engine: Arc<TransitionEngine>,
    pub zones: Arc<ZoneReferenceSet>,
    pub trip_store: Arc<dyn TripStorePort>,
}

impl std::fmt::Debug for AppComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppComponents")
            .field("engine", &self.engine)
            .field("zones", &self.zones.len())
            .finish_non_exhaustive()
    }
}

impl AppComponents {
    /// Build from configuration, loading zones from the configured file
    pub fn build(config: &AppConfig) -> Result<Self, BootstrapError> {
        Self::build_with_zones(config, load_zones_or_empty(&config.zones))
    }

    /// Build from configuration with an already loaded zone set
    pub fn build_with_zones(
        config: &AppConfig,
        zones: ZoneReferenceSet,
    ) -> Result<Self, BootstrapError> {
        let engine_config = EngineConfig {
            fare: config.fare.to_fare_schedule()?,
            currency: config.fare.currency.clone(),
            bill_subject: config.notification.subject_line.clone(),
        };

        let pool = create_pool(&config.database)?;
        let trip_store: Arc<dyn TripStorePort> = Arc::new(SqliteTripStore::new(Arc::new(pool)));
        let maps = Arc::new(MapsAdapter::new(&config.maps));
        let geo_resolver: Arc<dyn GeoResolverPort> = Arc::clone(&maps) as Arc<dyn GeoResolverPort>;
        let distance_estimator: Arc<dyn DistanceEstimatorPort> = maps;
        let zones = Arc::new(zones);

        let mut engine = TransitionEngine::new(
            Arc::clone(&zones),
            geo_resolver,
            distance_estimator,
            Arc::clone(&trip_store),
            engine_config,
        );

        let notifier = SmtpNotificationAdapter::new(config.smtp.as_ref());
        if notifier.is_configured() {
            let recipients = StaticRecipientDirectory::new(&config.notification.recipients);
            info!(recipients = recipients.len(), "Bill delivery enabled");
            engine = engine.with_notifications(Arc::new(notifier), Arc::new(recipients));
        }

        info!(zones = zones.len(), "Transition engine ready");
        Ok(Self {
            engine: Arc::new(engine),
            zones,
            trip_store,
        })
    }
}

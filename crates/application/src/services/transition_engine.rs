//! Toll-zone transition engine
//!
//! Consumes one location sample at a time and drives the per-subject
//! OUTSIDE/INSIDE state machine: opens a trip on zone entry and closes and
//! bills it on zone exit.

use std::sync::Arc;

use domain::{
    Coordinate, FareSchedule, LocationSample, TripExit, TripId, TripRecord, ZoneReferenceSet,
    ZoneState,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::SubjectLocks;
use crate::error::ApplicationError;
use crate::ports::{
    DistanceEstimatorPort, GeoResolverPort, NotificationPort, RecipientDirectoryPort, TollBill,
    TripStorePort,
};

/// Label stored when the entry or exit point could not be resolved
pub const UNAVAILABLE_LABEL: &str = "unavailable";

/// Result of processing one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// State unchanged
    NoChange,
    /// A trip was opened
    Entered { trip: TripRecord },
    /// The open trip was closed and billed
    Exited { trip: TripRecord },
    /// The open trip could not be closed safely and stays open
    ExitBlocked { trip_id: TripId, reason: String },
}

impl Outcome {
    /// Get a short label for logs and responses
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NoChange => "no_change",
            Self::Entered { .. } => "entered",
            Self::Exited { .. } => "exited",
            Self::ExitBlocked { .. } => "exit_blocked",
        }
    }

    /// The trip touched by this outcome, if any
    #[must_use]
    pub const fn trip(&self) -> Option<&TripRecord> {
        match self {
            Self::Entered { trip } | Self::Exited { trip } => Some(trip),
            Self::NoChange | Self::ExitBlocked { .. } => None,
        }
    }
}

/// Tariff and billing settings for the engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fare: FareSchedule,
    pub currency: String,
    pub bill_subject: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fare: FareSchedule::default(),
            currency: "INR".to_string(),
            bill_subject: "Toll Bill: Trip Completed".to_string(),
        }
    }
}

/// The stateful core of toll tracking
///
/// All subject state lives in the trip store; the engine itself only holds
/// the per-subject locks.
pub struct TransitionEngine {
    zones: Arc<ZoneReferenceSet>,
    geo_resolver: Arc<dyn GeoResolverPort>,
    distance_estimator: Arc<dyn DistanceEstimatorPort>,
    trip_store: Arc<dyn TripStorePort>,
    notifier: Option<Arc<dyn NotificationPort>>,
    recipients: Option<Arc<dyn RecipientDirectoryPort>>,
    locks: SubjectLocks,
    config: EngineConfig,
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("zones", &self.zones.len())
            .field("config", &self.config)
            .field("has_notifier", &self.notifier.is_some())
            .field("has_recipients", &self.recipients.is_some())
            .finish_non_exhaustive()
    }
}

impl TransitionEngine {
    /// Create an engine without bill delivery
    #[must_use]
    pub fn new(
        zones: Arc<ZoneReferenceSet>,
        geo_resolver: Arc<dyn GeoResolverPort>,
        distance_estimator: Arc<dyn DistanceEstimatorPort>,
        trip_store: Arc<dyn TripStorePort>,
        config: EngineConfig,
    ) -> Self {
        Self {
            zones,
            geo_resolver,
            distance_estimator,
            trip_store,
            notifier: None,
            recipients: None,
            locks: SubjectLocks::new(),
            config,
        }
    }

    /// Attach bill delivery
    #[must_use]
    pub fn with_notifications(
        mut self,
        notifier: Arc<dyn NotificationPort>,
        recipients: Arc<dyn RecipientDirectoryPort>,
    ) -> Self {
        self.notifier = Some(notifier);
        self.recipients = Some(recipients);
        self
    }

    /// The loaded zone reference set
    #[must_use]
    pub fn zones(&self) -> &ZoneReferenceSet {
        &self.zones
    }

    /// The trip store backing the engine
    #[must_use]
    pub fn trip_store(&self) -> &Arc<dyn TripStorePort> {
        &self.trip_store
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one location sample
    ///
    /// Only storage failures are returned as errors; every provider failure
    /// degrades to a definite outcome.
    #[instrument(skip(self, sample), fields(subject_id = %sample.subject_id))]
    pub async fn process_sample(
        &self,
        sample: &LocationSample,
    ) -> Result<Outcome, ApplicationError> {
        // The label does not depend on state, so it is resolved before locking.
        // With no zones loaded nothing can be in-zone and the lookup waits
        // until an exit needs it.
        let label = if self.zones.is_empty() {
            None
        } else {
            Some(self.resolve_label(&sample.coordinate).await)
        };
        let in_zone = label
            .as_ref()
            .and_then(Option::as_deref)
            .is_some_and(|label| self.zones.is_in_zone(label));

        let outcome = {
            let _guard = self.locks.lock(&sample.subject_id).await;
            let open_trip = self
                .trip_store
                .find_open_by_subject(&sample.subject_id)
                .await?;
            let state = ZoneState::from_open_trip(open_trip.as_ref());
            debug!(%state, in_zone, "Evaluating transition");

            match (open_trip, in_zone) {
                (None, false) | (Some(_), true) => Outcome::NoChange,
                (None, true) => self.enter(sample, label.flatten()).await?,
                (Some(trip), false) => {
                    let label = match label {
                        Some(label) => label,
                        None => self.resolve_label(&sample.coordinate).await,
                    };
                    self.exit(trip, sample, label).await?
                },
            }
        };

        if let Outcome::Exited { trip } = &outcome {
            self.dispatch_bill(trip).await;
        }
        Ok(outcome)
    }

    async fn resolve_label(&self, coordinate: &Coordinate) -> Option<String> {
        match self.geo_resolver.resolve_label(coordinate).await {
            Ok(label) => {
                let label = label.trim();
                if label.is_empty() {
                    None
                } else {
                    Some(label.to_string())
                }
            },
            Err(e) => {
                warn!(%coordinate, error = %e, "Location label unavailable, treating as outside");
                None
            },
        }
    }

    async fn enter(
        &self,
        sample: &LocationSample,
        label: Option<String>,
    ) -> Result<Outcome, ApplicationError> {
        let trip = TripRecord::open(
            sample.subject_id.clone(),
            sample.coordinate,
            label.unwrap_or_else(|| UNAVAILABLE_LABEL.to_string()),
            sample.observed_at,
        );
        self.trip_store.create(&trip).await?;

        info!(
            trip_id = %trip.id(),
            entry_label = %trip.entry().label,
            "Subject entered toll zone"
        );
        Ok(Outcome::Entered { trip })
    }

    async fn exit(
        &self,
        mut trip: TripRecord,
        sample: &LocationSample,
        label: Option<String>,
    ) -> Result<Outcome, ApplicationError> {
        let Some(entry_coordinate) = trip.usable_entry_coordinate() else {
            let reason = format!("trip {} has no usable entry coordinate", trip.id());
            warn!(trip_id = %trip.id(), %reason, "Exit blocked, trip left open");
            return Ok(Outcome::ExitBlocked {
                trip_id: trip.id(),
                reason,
            });
        };

        let distance_km = match self
            .distance_estimator
            .estimate_distance_km(&entry_coordinate, &sample.coordinate)
            .await
        {
            Ok(km) if km.is_finite() && km >= 0.0 => Some(km),
            Ok(km) => {
                warn!(trip_id = %trip.id(), distance_km = km, "Estimator returned an unusable distance");
                None
            },
            Err(e) => {
                warn!(trip_id = %trip.id(), error = %e, "Distance unavailable, billing zero");
                None
            },
        };
        let amount_due = self.config.fare.calculate(distance_km);

        let exit = TripExit {
            coordinate: sample.coordinate,
            label: label.unwrap_or_else(|| UNAVAILABLE_LABEL.to_string()),
            at: sample.observed_at,
            distance_km: distance_km.unwrap_or(0.0),
            amount_due,
        };
        if let Err(e) = trip.finalize(exit) {
            warn!(trip_id = %trip.id(), error = %e, "Exit blocked, trip left open");
            return Ok(Outcome::ExitBlocked {
                trip_id: trip.id(),
                reason: e.to_string(),
            });
        }
        self.trip_store.update(&trip).await?;

        info!(
            trip_id = %trip.id(),
            distance_km = trip.distance_km().unwrap_or_default(),
            amount_due,
            "Subject exited toll zone"
        );
        Ok(Outcome::Exited { trip })
    }

    /// Deliver the bill of a closed trip; failures are only logged
    async fn dispatch_bill(&self, trip: &TripRecord) {
        let (Some(notifier), Some(recipients)) = (&self.notifier, &self.recipients) else {
            debug!(trip_id = %trip.id(), "Bill delivery not configured");
            return;
        };

        let recipient = match recipients.recipient_for(trip.subject_id()).await {
            Ok(Some(recipient)) if !recipient.trim().is_empty() => recipient,
            Ok(_) => {
                warn!(trip_id = %trip.id(), "No recipient for subject, bill not sent");
                return;
            },
            Err(e) => {
                warn!(trip_id = %trip.id(), error = %e, "Recipient lookup failed, bill not sent");
                return;
            },
        };

        let bill = TollBill::for_trip(
            trip,
            recipient,
            self.config.bill_subject.clone(),
            self.config.fare.rate_per_km(),
            self.config.currency.clone(),
        );
        match notifier.send_bill(&bill).await {
            Ok(()) => info!(trip_id = %trip.id(), "Bill sent"),
            Err(e) => warn!(trip_id = %trip.id(), error = %e, "Bill delivery failed"),
        }
    }
}

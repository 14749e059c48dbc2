//! Trip storage port
//!
//! Defines the interface for persisting and querying trip records.
//! Adapters in the infrastructure layer implement this port using SQLite.

use async_trait::async_trait;
use domain::{SubjectId, TripId, TripRecord};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for trip persistence operations
///
/// Every failure is reported as `ApplicationError::Persistence` and leaves
/// storage unchanged.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TripStorePort: Send + Sync {
    /// Insert a newly opened trip
    ///
    /// Fails if the subject already has an open trip.
    async fn create(&self, trip: &TripRecord) -> Result<(), ApplicationError>;

    /// Write a finalized trip back by its id
    ///
    /// Fails, without writing, unless the stored row is still open.
    async fn update(&self, trip: &TripRecord) -> Result<(), ApplicationError>;

    /// The subject's open trip, if any
    async fn find_open_by_subject(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<TripRecord>, ApplicationError>;

    /// Get a trip by ID
    async fn get(&self, id: &TripId) -> Result<Option<TripRecord>, ApplicationError>;

    /// Most recent trips of a subject, newest first
    async fn list_by_subject(
        &self,
        subject_id: &SubjectId,
        limit: u32,
    ) -> Result<Vec<TripRecord>, ApplicationError>;

    /// Number of trips currently open across all subjects
    async fn count_open(&self) -> Result<u64, ApplicationError>;
}

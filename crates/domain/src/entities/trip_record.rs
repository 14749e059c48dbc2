//! Trip record entity - one traversal of a toll zone, from entry to exit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    value_objects::{Coordinate, SubjectId, TripId},
};

/// Position of a subject relative to the toll zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneState {
    /// No open trip
    Outside,
    /// Exactly one open trip awaiting its exit
    Inside,
}

impl ZoneState {
    /// Derive the state from the subject's open trip, if any
    #[must_use]
    pub const fn from_open_trip(open_trip: Option<&TripRecord>) -> Self {
        if open_trip.is_some() {
            Self::Inside
        } else {
            Self::Outside
        }
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Outside => "OUTSIDE",
            Self::Inside => "INSIDE",
        }
    }
}

impl std::fmt::Display for ZoneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where and when a trip began
///
/// The coordinate is optional only because stored rows can be damaged;
/// trips opened by the engine always carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEntry {
    pub coordinate: Option<Coordinate>,
    pub label: String,
    pub at: DateTime<Utc>,
}

/// Where and when a trip ended, with its bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripExit {
    pub coordinate: Coordinate,
    pub label: String,
    pub at: DateTime<Utc>,
    pub distance_km: f64,
    pub amount_due: f64,
}

/// A toll trip
///
/// Created open on zone entry and closed exactly once on zone exit. After
/// closing only the `paid` flag may change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    id: TripId,
    subject_id: SubjectId,
    entry: TripEntry,
    exit: Option<TripExit>,
    paid: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TripRecord {
    /// Open a new trip at the entry point
    #[must_use]
    pub fn open(
        subject_id: SubjectId,
        coordinate: Coordinate,
        label: impl Into<String>,
        entered_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TripId::new(),
            subject_id,
            entry: TripEntry {
                coordinate: Some(coordinate),
                label: label.into(),
                at: entered_at,
            },
            exit: None,
            paid: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a trip from stored state
    #[must_use]
    pub const fn restore(
        id: TripId,
        subject_id: SubjectId,
        entry: TripEntry,
        exit: Option<TripExit>,
        paid: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject_id,
            entry,
            exit,
            paid,
            created_at,
            updated_at,
        }
    }

    /// Close the trip
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TripAlreadyClosed` if the trip was closed before
    /// and `DomainError::MissingEntryCoordinate` if the entry is damaged.
    /// The record is unchanged on error.
    pub fn finalize(&mut self, exit: TripExit) -> Result<(), DomainError> {
        if self.exit.is_some() {
            return Err(DomainError::TripAlreadyClosed {
                trip_id: self.id.to_string(),
            });
        }
        if self.usable_entry_coordinate().is_none() {
            return Err(DomainError::MissingEntryCoordinate {
                trip_id: self.id.to_string(),
            });
        }
        self.exit = Some(exit);
        self.paid = false;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The entry coordinate, if present and well formed
    #[must_use]
    pub fn usable_entry_coordinate(&self) -> Option<Coordinate> {
        self.entry.coordinate.filter(Coordinate::is_well_formed)
    }

    #[must_use]
    pub const fn id(&self) -> TripId {
        self.id
    }

    #[must_use]
    pub const fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub const fn entry(&self) -> &TripEntry {
        &self.entry
    }

    #[must_use]
    pub const fn exit(&self) -> Option<&TripExit> {
        self.exit.as_ref()
    }

    /// True while the trip awaits its exit
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.exit.is_none()
    }

    #[must_use]
    pub const fn is_paid(&self) -> bool {
        self.paid
    }

    #[must_use]
    pub fn distance_km(&self) -> Option<f64> {
        self.exit.as_ref().map(|e| e.distance_km)
    }

    #[must_use]
    pub fn amount_due(&self) -> Option<f64> {
        self.exit.as_ref().map(|e| e.amount_due)
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

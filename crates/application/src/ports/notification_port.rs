//! Bill notification port
//!
//! Delivers the bill of a completed trip to the subject.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::TripRecord;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Notification errors
///
/// None of these affect the trip, which is closed before delivery starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("No recipient for notification")]
    NoRecipient,

    #[error("Notification transport not configured")]
    NotConfigured,

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// One end of a billed trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillStop {
    pub label: Option<String>,
    pub at: Option<DateTime<Utc>>,
}

/// The bill of a completed trip, addressed to a recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TollBill {
    pub recipient: String,
    pub subject_line: String,
    pub entry: BillStop,
    pub exit: BillStop,
    pub distance_km: Option<f64>,
    pub amount_due: Option<f64>,
    pub rate_per_km: f64,
    pub currency: String,
}

impl TollBill {
    /// Build the bill for a trip
    #[must_use]
    pub fn for_trip(
        trip: &TripRecord,
        recipient: impl Into<String>,
        subject_line: impl Into<String>,
        rate_per_km: f64,
        currency: impl Into<String>,
    ) -> Self {
        let exit = trip.exit();
        Self {
            recipient: recipient.into(),
            subject_line: subject_line.into(),
            entry: BillStop {
                label: Some(trip.entry().label.clone()),
                at: Some(trip.entry().at),
            },
            exit: BillStop {
                label: exit.map(|e| e.label.clone()),
                at: exit.map(|e| e.at),
            },
            distance_km: trip.distance_km(),
            amount_due: trip.amount_due(),
            rate_per_km,
            currency: currency.into(),
        }
    }
}

/// Port for delivering bills
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Send a bill; `Ok` means the transport accepted it
    async fn send_bill(&self, bill: &TollBill) -> Result<(), NotificationError>;
}

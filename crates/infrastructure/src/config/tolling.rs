//! Tolling configurations: zone data, fare and bill notification.

use std::collections::HashMap;

use domain::{DomainError, FareSchedule};
use serde::{Deserialize, Serialize};

// ==============================
// Zone Data
// ==============================

/// Where the zone reference set is loaded from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesConfig {
    /// CSV file holding the reference labels
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Column holding the labels
    #[serde(default = "default_identifier_column")]
    pub identifier_column: String,
}

fn default_data_file() -> String {
    "final_toll_data.csv".to_string()
}

fn default_identifier_column() -> String {
    "formatted_address".to_string()
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            identifier_column: default_identifier_column(),
        }
    }
}

// ==============================
// Fare
// ==============================

/// Tariff settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareConfig {
    /// Currency units per kilometre
    #[serde(default = "default_rate_per_km")]
    pub rate_per_km: f64,

    /// Currency code printed on bills
    #[serde(default = "default_currency")]
    pub currency: String,
}

const fn default_rate_per_km() -> f64 {
    FareSchedule::DEFAULT_RATE_PER_KM
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            rate_per_km: default_rate_per_km(),
            currency: default_currency(),
        }
    }
}

impl FareConfig {
    /// Build the domain fare schedule
    pub fn to_fare_schedule(&self) -> Result<FareSchedule, DomainError> {
        FareSchedule::new(self.rate_per_km)
    }
}

// ==============================
// Notification
// ==============================

/// Bill notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Subject line of bill emails
    #[serde(default = "default_subject_line")]
    pub subject_line: String,

    /// Subject id to email address
    #[serde(default)]
    pub recipients: HashMap<String, String>,
}

fn default_subject_line() -> String {
    "Toll Bill: Trip Completed".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            subject_line: default_subject_line(),
            recipients: HashMap::new(),
        }
    }
}

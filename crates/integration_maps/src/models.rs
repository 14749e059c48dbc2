//! Raw response shapes of the Maps web services

use serde::Deserialize;

/// Status value reported on success
pub const STATUS_OK: &str = "OK";

/// Status value reported when geocoding finds nothing
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Top-level statuses that mean the service itself refused or failed
const PROVIDER_FAULTS: &[&str] = &[
    "REQUEST_DENIED",
    "OVER_QUERY_LIMIT",
    "OVER_DAILY_LIMIT",
    "UNKNOWN_ERROR",
];

/// Whether a top-level status is a provider fault rather than a routing answer
pub fn is_provider_fault(status: &str) -> bool {
    PROVIDER_FAULTS.contains(&status)
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rows: Vec<DistanceMatrixRow>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixRow {
    #[serde(default)]
    pub elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixElement {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub distance: Option<TextValue>,
}

/// A `{text, value}` pair; `value` is kept loose because the service has
/// been seen to return it in several shapes.
#[derive(Debug, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl DistanceMatrixResponse {
    /// The single origin/destination element, if present
    pub fn first_element(&self) -> Option<&DistanceMatrixElement> {
        self.rows.first().and_then(|row| row.elements.first())
    }
}

impl DistanceMatrixElement {
    /// Distance in metres, when the value is a finite non-negative number
    pub fn distance_meters(&self) -> Option<f64> {
        self.distance
            .as_ref()
            .and_then(|d| d.value.as_ref())
            .and_then(serde_json::Value::as_f64)
            .filter(|m| m.is_finite() && *m >= 0.0)
    }
}

//! Distance-based fare calculation

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Round a monetary or distance value to two decimal places
///
/// Exact half-cents round to the even neighbour, so 1.125 becomes 1.12.
#[must_use]
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Fixed per-kilometre tariff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareSchedule {
    rate_per_km: f64,
}

impl FareSchedule {
    /// Tariff applied when none is configured
    pub const DEFAULT_RATE_PER_KM: f64 = 3.0;

    /// Create a schedule with the given rate
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFareRate` if the rate is negative or not finite
    pub fn new(rate_per_km: f64) -> Result<Self, DomainError> {
        if !rate_per_km.is_finite() || rate_per_km < 0.0 {
            return Err(DomainError::InvalidFareRate(rate_per_km.to_string()));
        }
        Ok(Self { rate_per_km })
    }

    /// The configured rate
    #[must_use]
    pub const fn rate_per_km(&self) -> f64 {
        self.rate_per_km
    }

    /// Amount due for a travelled distance
    ///
    /// Total: an absent, negative or non-finite distance costs nothing.
    #[must_use]
    pub fn calculate(&self, distance_km: Option<f64>) -> f64 {
        match distance_km {
            Some(km) if km.is_finite() && km >= 0.0 => round_to_cents(km * self.rate_per_km),
            _ => 0.0,
        }
    }
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            rate_per_km: Self::DEFAULT_RATE_PER_KM,
        }
    }
}

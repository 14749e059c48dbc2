//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// A WGS-84 coordinate pair in degrees
///
/// Only numeric well-formedness is checked. Range checks are left to the
/// providers that consume the coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from finite components
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if either component is NaN or infinite
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let candidate = Self {
            latitude,
            longitude,
        };
        if candidate.is_well_formed() {
            Ok(candidate)
        } else {
            Err(DomainError::InvalidCoordinate(format!(
                "({latitude}, {longitude})"
            )))
        }
    }

    /// Create a coordinate without validation (for trusted sources)
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a coordinate from two textual components
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if either part is not a finite number
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, DomainError> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidCoordinate(format!("latitude '{latitude}'")))?;
        let lon = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidCoordinate(format!("longitude '{longitude}'")))?;
        Self::new(lat, lon)
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Both components are finite numbers
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_finite_components() {
        let c = Coordinate::new(10.0, 20.0).expect("valid coordinate");
        assert!((c.latitude() - 10.0).abs() < f64::EPSILON);
        assert!((c.longitude() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_values_are_still_well_formed() {
        assert!(Coordinate::new(123.0, -500.0).is_ok());
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(!Coordinate::new_unchecked(f64::NAN, 1.0).is_well_formed());
    }

    #[test]
    fn parses_text_with_whitespace() {
        let c = Coordinate::parse(" 12.9716 ", "77.5946").expect("parse");
        assert!((c.latitude() - 12.9716).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Coordinate::parse("north", "77.5").unwrap_err();
        assert!(err.to_string().contains("latitude"));
        assert!(Coordinate::parse("1.0", "").is_err());
        assert!(Coordinate::parse("NaN", "1.0").is_err());
    }

    #[test]
    fn display_uses_six_decimals() {
        let c = Coordinate::new_unchecked(10.5, 20.25);
        assert_eq!(c.to_string(), "10.500000, 20.250000");
    }

    #[test]
    fn serialization_roundtrip() {
        let c = Coordinate::new_unchecked(10.5, 20.5);
        let json = serde_json::to_string(&c).expect("serialize");
        let back: Coordinate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(c, back);
    }
}

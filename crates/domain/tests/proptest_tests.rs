//! Property-based tests for the toll domain
//!
//! These tests use proptest to check invariants across many random inputs.

use chrono::{TimeZone, Utc};
use domain::{
    Coordinate, FareSchedule, SubjectId, TripExit, TripRecord, ZoneReferenceSet, round_to_cents,
};
use proptest::prelude::*;

// ============================================================================
// Coordinate
// ============================================================================

mod coordinate_tests {
    use super::*;

    proptest! {
        #[test]
        fn finite_pairs_are_accepted(lat in -1.0e6f64..1.0e6, lon in -1.0e6f64..1.0e6) {
            let coord = Coordinate::new(lat, lon).unwrap();
            prop_assert!(coord.is_well_formed());
            prop_assert_eq!(coord.latitude(), lat);
            prop_assert_eq!(coord.longitude(), lon);
        }

        #[test]
        fn textual_parse_matches_numeric(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let parsed = Coordinate::parse(&lat.to_string(), &format!("  {lon} ")).unwrap();
            prop_assert_eq!(parsed, Coordinate::new(lat, lon).unwrap());
        }

        #[test]
        fn non_finite_latitude_is_rejected(
            lat in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
            lon in -180.0f64..=180.0,
        ) {
            prop_assert!(Coordinate::new(lat, lon).is_err());
        }
    }
}

// ============================================================================
// SubjectId
// ============================================================================

mod subject_id_tests {
    use super::*;

    proptest! {
        #[test]
        fn surrounding_whitespace_is_ignored(id in "[A-Z0-9]{1,20}", pad in " {0,4}") {
            let padded = SubjectId::new(format!("{pad}{id}{pad}")).unwrap();
            prop_assert_eq!(padded.as_str(), id.as_str());
            prop_assert_eq!(padded, SubjectId::new(id.clone()).unwrap());
        }

        #[test]
        fn blank_ids_are_rejected(blank in "[ \t]{0,8}") {
            prop_assert!(SubjectId::new(blank).is_err());
        }
    }
}

// ============================================================================
// FareSchedule
// ============================================================================

mod fare_tests {
    use super::*;

    proptest! {
        #[test]
        fn fare_is_within_half_a_cent_of_exact(
            rate in 0.0f64..100.0,
            km in 0.0f64..5_000.0,
        ) {
            let fare = FareSchedule::new(rate).unwrap();
            let exact = rate * km;
            prop_assert!((fare.calculate(Some(km)) - exact).abs() <= 0.005 + 1e-9);
        }

        #[test]
        fn absent_or_invalid_distance_costs_nothing(rate in 0.0f64..100.0) {
            let fare = FareSchedule::new(rate).unwrap();
            prop_assert_eq!(fare.calculate(None), 0.0);
            prop_assert_eq!(fare.calculate(Some(f64::NAN)), 0.0);
            prop_assert_eq!(fare.calculate(Some(-1.0)), 0.0);
        }

        #[test]
        fn rounding_is_idempotent(value in -1.0e6f64..1.0e6) {
            let once = round_to_cents(value);
            prop_assert_eq!(round_to_cents(once), once);
        }

        #[test]
        fn negative_rates_are_rejected(rate in -100.0f64..-0.001) {
            prop_assert!(FareSchedule::new(rate).is_err());
        }
    }
}

// ============================================================================
// ZoneReferenceSet
// ============================================================================

mod zone_tests {
    use super::*;

    proptest! {
        #[test]
        fn padded_members_match_trimmed_labels(member in "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,6})?") {
            let zones = ZoneReferenceSet::from_labels([format!("  {member}\t")]);
            prop_assert_eq!(zones.len(), 1);
            prop_assert!(zones.is_in_zone(&member));
            let padded = format!(" {member} ");
            prop_assert!(zones.is_in_zone(&padded));
        }

        #[test]
        fn unrelated_lowercase_labels_never_match(label in "[a-z ]{0,30}") {
            let zones = ZoneReferenceSet::from_labels(["Plaza A", "Sunset Toll Gate"]);
            prop_assert!(!zones.is_in_zone(&label));
        }

        #[test]
        fn duplicates_collapse(member in "[A-Z][a-z]{2,10}", copies in 1usize..6) {
            let zones = ZoneReferenceSet::from_labels(std::iter::repeat_n(member.as_str(), copies));
            prop_assert_eq!(zones.len(), 1);
        }
    }
}

// ============================================================================
// TripRecord
// ============================================================================

mod trip_tests {
    use super::*;

    proptest! {
        #[test]
        fn a_trip_closes_exactly_once(km in 0.0f64..1_000.0) {
            let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
            let mut trip = TripRecord::open(
                SubjectId::new("KA01").unwrap(),
                Coordinate::new_unchecked(12.9, 77.6),
                "Plaza A".to_string(),
                at,
            );
            let exit = TripExit {
                coordinate: Coordinate::new_unchecked(13.0, 77.7),
                label: "Market Street".to_string(),
                at,
                distance_km: round_to_cents(km),
                amount_due: FareSchedule::default().calculate(Some(km)),
            };

            prop_assert!(trip.finalize(exit.clone()).is_ok());
            prop_assert!(!trip.is_open());
            prop_assert!(!trip.is_paid());
            prop_assert!(trip.finalize(exit).is_err());
        }
    }
}

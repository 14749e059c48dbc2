//! Output formatting for the local commands

use std::fmt::Write as _;

use domain::{FareSchedule, TripRecord, ZoneMatch, ZoneReferenceSet};
use infrastructure::ZoneLoadSummary;

use crate::replay::ReplaySummary;

/// Describe whether `label` is inside a toll zone
pub fn describe_zone_check(zones: &ZoneReferenceSet, label: &str) -> String {
    match zones.find_match(label) {
        Some(ZoneMatch::Exact(member)) => format!("IN ZONE (exact match: {member})"),
        Some(ZoneMatch::Partial(member)) => format!("IN ZONE (contains: {member})"),
        None if zones.is_empty() => "OUTSIDE (zone set is empty)".to_string(),
        None => "OUTSIDE".to_string(),
    }
}

/// Summarize a zone data load
pub fn describe_zone_stats(summary: &ZoneLoadSummary, zones: &ZoneReferenceSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rows read:      {}", summary.rows);
    let _ = writeln!(out, "Rows skipped:   {}", summary.skipped);
    let _ = writeln!(out, "Unique labels:  {}", zones.len());
    out
}

/// Fare line for a distance
pub fn describe_fare(schedule: &FareSchedule, km: f64, currency: &str) -> String {
    let amount = schedule.calculate(Some(km));
    format!(
        "{km:.2} km x {:.2} {currency}/km = {amount:.2} {currency}",
        schedule.rate_per_km()
    )
}

/// Table of trips, newest first
pub fn describe_trips(trips: &[TripRecord]) -> String {
    if trips.is_empty() {
        return "No trips recorded".to_string();
    }

    let mut out = String::new();
    for trip in trips {
        let entry = trip.entry();
        let _ = write!(
            out,
            "{}  entered {} at {}",
            trip.id(),
            entry.at.format("%Y-%m-%d %H:%M:%S"),
            entry.label
        );
        match trip.exit() {
            Some(exit) => {
                let _ = writeln!(
                    out,
                    "\n    exited  {} at {}  {:.2} km  due {:.2}{}",
                    exit.at.format("%Y-%m-%d %H:%M:%S"),
                    exit.label,
                    exit.distance_km,
                    exit.amount_due,
                    if trip.is_paid() { "  (paid)" } else { "" }
                );
            },
            None => {
                let _ = writeln!(out, "\n    open");
            },
        }
    }
    out
}

/// One-line replay report
pub fn describe_replay(summary: &ReplaySummary) -> String {
    format!(
        "{} rows: {} entered, {} exited, {} blocked, {} unchanged, {} rejected",
        summary.rows,
        summary.entered,
        summary.exited,
        summary.exit_blocked,
        summary.no_change,
        summary.rejected
    )
}

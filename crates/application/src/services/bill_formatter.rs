//! Plain-text rendering of toll bills
//!
//! Missing values render as `N/A` so a partially filled bill still reads
//! cleanly.

use chrono::{DateTime, Utc};

use crate::ports::TollBill;

const MISSING: &str = "N/A";

/// Render the body of a bill email
#[must_use]
pub fn format_bill_body(bill: &TollBill) -> String {
    let entry_label = bill.entry.label.as_deref().unwrap_or(MISSING);
    let exit_label = bill.exit.label.as_deref().unwrap_or(MISSING);
    let currency = &bill.currency;

    format!(
        "Dear User,\n\
         \n\
         A new toll charge has been calculated for your recent trip.\n\
         \n\
         Entry Point: {entry_label}\n\
         Entry Time: {entry_time}\n\
         \n\
         Exit Point: {exit_label}\n\
         Exit Time: {exit_time}\n\
         \n\
         Distance Travelled: {distance} km\n\
         Toll Amount Due: {currency} {amount} (Rate: {currency} {rate:.2}/km)\n\
         \n\
         Please log in to the portal to view details and make payment.\n\
         \n\
         Thank you,\n\
         Toll Road Authority\n",
        entry_time = format_timestamp(bill.entry.at),
        exit_time = format_timestamp(bill.exit.at),
        distance = format_amount(bill.distance_km),
        amount = format_amount(bill.amount_due),
        rate = bill.rate_per_km,
    )
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || MISSING.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn format_amount(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"))
}

//! Replay of recorded location samples
//!
//! Rows are fed to the engine strictly in file order, one at a time, so a
//! subject's transitions come out the same as they did live.

use std::io::Read;

use anyhow::{Context, Result};
use application::services::{Outcome, TransitionEngine};
use chrono::{DateTime, Utc};
use domain::{Coordinate, LocationSample, SubjectId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One CSV row as written by tracking exports
#[derive(Debug, Deserialize)]
struct SampleRow {
    subject_id: String,
    latitude: String,
    longitude: String,
    #[serde(default)]
    observed_at: Option<String>,
}

impl SampleRow {
    fn into_sample(self, fallback_time: DateTime<Utc>) -> Result<LocationSample> {
        let subject_id = SubjectId::new(self.subject_id)?;
        let coordinate = Coordinate::parse(&self.latitude, &self.longitude)?;
        let observed_at = match self.observed_at.as_deref().map(str::trim) {
            None | Some("") => fallback_time,
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid observed_at '{raw}'"))?
                .with_timezone(&Utc),
        };
        Ok(LocationSample::new(subject_id, coordinate, observed_at))
    }
}

/// Counts of what a replay did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub rows: usize,
    pub rejected: usize,
    pub no_change: usize,
    pub entered: usize,
    pub exited: usize,
    pub exit_blocked: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::NoChange => self.no_change += 1,
            Outcome::Entered { .. } => self.entered += 1,
            Outcome::Exited { .. } => self.exited += 1,
            Outcome::ExitBlocked { .. } => self.exit_blocked += 1,
        }
    }
}

/// Feed every row of `reader` through `engine`
///
/// Malformed rows are skipped. A storage failure stops the replay, since
/// later rows of the same subject depend on the failed one.
pub async fn replay_samples<R: Read>(
    engine: &TransitionEngine,
    reader: R,
) -> Result<ReplaySummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut summary = ReplaySummary::default();
    for (index, row) in csv_reader.deserialize::<SampleRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        summary.rows += 1;

        let sample = match row
            .map_err(anyhow::Error::from)
            .and_then(|row| row.into_sample(Utc::now()))
        {
            Ok(sample) => sample,
            Err(e) => {
                warn!(line, error = %e, "Skipping malformed sample row");
                summary.rejected += 1;
                continue;
            },
        };

        let outcome = engine
            .process_sample(&sample)
            .await
            .with_context(|| format!("line {line}: sample for {} not stored", sample.subject_id))?;
        debug!(line, outcome = outcome.label(), "Replayed sample");
        summary.record(&outcome);
    }

    Ok(summary)
}

//! CSV loader for the zone reference set
//!
//! Every load problem is non-fatal for callers of [`load_zones_or_empty`]:
//! the set stays empty and no sample is ever classified in-zone.

use std::{fs::File, io::Read, path::Path};

use domain::ZoneReferenceSet;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::ZonesConfig;

/// Cell values treated as missing, as spreadsheet and dataframe exports write them
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Errors that can occur while loading zone data
#[derive(Debug, Error)]
pub enum ZoneLoadError {
    #[error("Zone data file not found: {0}")]
    NotFound(String),

    #[error("Failed to read zone data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zone data file is empty")]
    Empty,

    #[error("Column '{column}' not found (columns: {available})")]
    MissingColumn { column: String, available: String },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// What a load found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneLoadSummary {
    /// Data rows read
    pub rows: usize,
    /// Rows whose cell was blank or a missing marker
    pub skipped: usize,
    /// Distinct labels kept
    pub unique: usize,
}

/// Load labels from `column` of the CSV file at `path`
pub fn load_zones(
    path: &Path,
    column: &str,
) -> Result<(ZoneReferenceSet, ZoneLoadSummary), ZoneLoadError> {
    info!(path = %path.display(), column = %column, "Loading zone reference data");
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ZoneLoadError::NotFound(path.display().to_string())
        } else {
            ZoneLoadError::Io(e)
        }
    })?;
    load_zones_from_reader(file, column)
}

/// Load labels from `column` of CSV data with a header row
pub fn load_zones_from_reader<R: Read>(
    source: R,
    column: &str,
) -> Result<(ZoneReferenceSet, ZoneLoadSummary), ZoneLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(ZoneLoadError::Empty);
    }
    debug!(columns = ?headers.iter().collect::<Vec<_>>(), "Zone data columns");

    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ZoneLoadError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().collect::<Vec<_>>().join(", "),
        })?;

    let mut summary = ZoneLoadSummary::default();
    let mut labels = Vec::new();
    for record in reader.records() {
        let record = record?;
        summary.rows += 1;
        match record.get(index).map(str::trim) {
            Some(value) if !MISSING_MARKERS.contains(&value) => labels.push(value.to_string()),
            _ => summary.skipped += 1,
        }
    }

    let zones = ZoneReferenceSet::from_labels(labels);
    summary.unique = zones.len();

    if zones.is_empty() {
        warn!(column = %column, "Zone column contained no usable labels");
    } else {
        info!(zones = zones.len(), rows = summary.rows, "Loaded zone reference set");
    }
    Ok((zones, summary))
}

/// Load the configured zone data, logging any failure and returning an
/// empty set instead
pub fn load_zones_or_empty(config: &ZonesConfig) -> ZoneReferenceSet {
    match load_zones(Path::new(&config.data_file), &config.identifier_column) {
        Ok((zones, _)) => zones,
        Err(e) => {
            error!(
                error = %e,
                path = %config.data_file,
                "Zone data unavailable; toll zone checking disabled"
            );
            ZoneReferenceSet::empty()
        },
    }
}

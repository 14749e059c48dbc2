//! SQLite trip store implementation
//!
//! Implements the TripStorePort using SQLite.

use std::sync::Arc;

use application::{error::ApplicationError, ports::TripStorePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Coordinate, SubjectId, TripEntry, TripExit, TripId, TripRecord};
use rusqlite::{OptionalExtension, Row, params, types::Type};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::{ConnectionPool, DatabaseError};

const TRIP_COLUMNS: &str = "id, subject_id, entry_latitude, entry_longitude, entry_label, entry_at,
     exit_latitude, exit_longitude, exit_label, exit_at, distance_km, amount_due,
     paid, open, created_at, updated_at";

/// SQLite-based trip store
#[derive(Debug, Clone)]
pub struct SqliteTripStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteTripStore {
    /// Create a new SQLite trip store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Run a blocking closure against a pooled connection
    async fn with_conn<T, F>(&self, f: F) -> Result<T, ApplicationError>
    where
        T: Send + 'static,
        F: FnOnce(&mut rusqlite::Connection) -> Result<T, ApplicationError> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(DatabaseError::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Database task failed: {e}")))?
    }
}

#[async_trait]
impl TripStorePort for SqliteTripStore {
    #[instrument(skip(self, trip), fields(trip_id = %trip.id(), subject_id = %trip.subject_id()))]
    async fn create(&self, trip: &TripRecord) -> Result<(), ApplicationError> {
        let trip = trip.clone();

        self.with_conn(move |conn| {
            let entry = trip.entry();
            let exit = trip.exit();
            let result = conn.execute(
                &format!(
                    "INSERT INTO trips ({TRIP_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ),
                params![
                    trip.id().to_string(),
                    trip.subject_id().as_str(),
                    entry.coordinate.map(|c| c.latitude()),
                    entry.coordinate.map(|c| c.longitude()),
                    entry.label,
                    format_timestamp(entry.at),
                    exit.map(|e| e.coordinate.latitude()),
                    exit.map(|e| e.coordinate.longitude()),
                    exit.map(|e| e.label.as_str()),
                    exit.map(|e| format_timestamp(e.at)),
                    exit.map(|e| e.distance_km),
                    exit.map(|e| e.amount_due),
                    trip.is_paid(),
                    trip.is_open(),
                    format_timestamp(trip.created_at()),
                    format_timestamp(trip.updated_at()),
                ],
            );

            match result {
                Ok(_) => {
                    debug!("Created trip");
                    Ok(())
                },
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    warn!("Subject already has an open trip");
                    Err(ApplicationError::Persistence(format!(
                        "subject {} already has an open trip",
                        trip.subject_id()
                    )))
                },
                Err(e) => Err(DatabaseError::from(e).into()),
            }
        })
        .await
    }

    #[instrument(skip(self, trip), fields(trip_id = %trip.id()))]
    async fn update(&self, trip: &TripRecord) -> Result<(), ApplicationError> {
        let trip = trip.clone();

        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(DatabaseError::from)?;
            let exit = trip.exit();

            let changed = tx
                .execute(
                    "UPDATE trips
                     SET exit_latitude = ?1, exit_longitude = ?2, exit_label = ?3, exit_at = ?4,
                         distance_km = ?5, amount_due = ?6, paid = ?7, open = ?8, updated_at = ?9
                     WHERE id = ?10 AND open = 1",
                    params![
                        exit.map(|e| e.coordinate.latitude()),
                        exit.map(|e| e.coordinate.longitude()),
                        exit.map(|e| e.label.as_str()),
                        exit.map(|e| format_timestamp(e.at)),
                        exit.map(|e| e.distance_km),
                        exit.map(|e| e.amount_due),
                        trip.is_paid(),
                        trip.is_open(),
                        format_timestamp(trip.updated_at()),
                        trip.id().to_string(),
                    ],
                )
                .map_err(DatabaseError::from)?;

            if changed == 0 {
                // Dropping the transaction rolls it back
                return Err(ApplicationError::Persistence(format!(
                    "trip {} is not open or does not exist",
                    trip.id()
                )));
            }

            tx.commit().map_err(DatabaseError::from)?;
            debug!("Updated trip");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(subject_id = %subject_id))]
    async fn find_open_by_subject(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<TripRecord>, ApplicationError> {
        let subject = subject_id.as_str().to_string();

        self.with_conn(move |conn| {
            let trip = conn
                .query_row(
                    &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE subject_id = ?1 AND open = 1"),
                    [&subject],
                    row_to_trip,
                )
                .optional()
                .map_err(DatabaseError::from)?;
            Ok(trip)
        })
        .await
    }

    #[instrument(skip(self), fields(trip_id = %id))]
    async fn get(&self, id: &TripId) -> Result<Option<TripRecord>, ApplicationError> {
        let id_str = id.to_string();

        self.with_conn(move |conn| {
            let trip = conn
                .query_row(
                    &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"),
                    [&id_str],
                    row_to_trip,
                )
                .optional()
                .map_err(DatabaseError::from)?;
            Ok(trip)
        })
        .await
    }

    #[instrument(skip(self), fields(subject_id = %subject_id))]
    async fn list_by_subject(
        &self,
        subject_id: &SubjectId,
        limit: u32,
    ) -> Result<Vec<TripRecord>, ApplicationError> {
        let subject = subject_id.as_str().to_string();

        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {TRIP_COLUMNS} FROM trips WHERE subject_id = ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2"
                ))
                .map_err(DatabaseError::from)?;

            let trips = stmt
                .query_map(params![subject, limit], row_to_trip)
                .map_err(DatabaseError::from)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(DatabaseError::from)?;
            Ok(trips)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn count_open(&self) -> Result<u64, ApplicationError> {
        self.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM trips WHERE open = 1", [], |row| {
                    row.get(0)
                })
                .map_err(DatabaseError::from)?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

fn conversion_error(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn parse_timestamp(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(index, e))
}

fn parse_optional_timestamp(
    row: &Row<'_>,
    index: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(index)?;
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(index, e))
    })
    .transpose()
}

fn row_to_trip(row: &Row<'_>) -> rusqlite::Result<TripRecord> {
    let id_str: String = row.get(0)?;
    let id = TripId::parse(&id_str).map_err(|e| conversion_error(0, e))?;
    let subject_str: String = row.get(1)?;
    let subject_id = SubjectId::new(subject_str).map_err(|e| conversion_error(1, e))?;

    let entry_latitude: Option<f64> = row.get(2)?;
    let entry_longitude: Option<f64> = row.get(3)?;
    let entry = TripEntry {
        coordinate: entry_latitude
            .zip(entry_longitude)
            .map(|(lat, lon)| Coordinate::new_unchecked(lat, lon)),
        label: row.get(4)?,
        at: parse_timestamp(row, 5)?,
    };

    let exit_latitude: Option<f64> = row.get(6)?;
    let exit_longitude: Option<f64> = row.get(7)?;
    let exit_label: Option<String> = row.get(8)?;
    let exit_at = parse_optional_timestamp(row, 9)?;
    let distance_km: Option<f64> = row.get(10)?;
    let amount_due: Option<f64> = row.get(11)?;
    let open: bool = row.get(13)?;

    let exit = match (
        exit_latitude.zip(exit_longitude),
        exit_label,
        exit_at,
        distance_km,
        amount_due,
    ) {
        (Some((lat, lon)), Some(label), Some(at), Some(distance_km), Some(amount_due)) => {
            Some(TripExit {
                coordinate: Coordinate::new_unchecked(lat, lon),
                label,
                at,
                distance_km,
                amount_due,
            })
        },
        _ => None,
    };

    if !open && exit.is_none() {
        return Err(conversion_error(
            13,
            DatabaseError::CorruptRow(format!("closed trip {id} has incomplete exit fields")),
        ));
    }

    Ok(TripRecord::restore(
        id,
        subject_id,
        entry,
        exit,
        row.get(12)?,
        parse_timestamp(row, 14)?,
        parse_timestamp(row, 15)?,
    ))
}

//! Database migrations
//!
//! Versions are recorded in `schema_version`. Each pending step runs in its
//! own transaction together with the version bump, so a failed step leaves
//! the schema at the previous version.

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// One schema step
struct Migration {
    version: i32,
    name: &'static str,
    sql: &'static str,
}

/// Entry coordinates are nullable so damaged rows can still be loaded and
/// reported instead of failing the whole query.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "trips",
        sql: "
            CREATE TABLE IF NOT EXISTS trips (
                id TEXT PRIMARY KEY,
                subject_id TEXT NOT NULL,
                entry_latitude REAL,
                entry_longitude REAL,
                entry_label TEXT NOT NULL,
                entry_at TEXT NOT NULL,
                exit_latitude REAL,
                exit_longitude REAL,
                exit_label TEXT,
                exit_at TEXT,
                distance_km REAL,
                amount_due REAL,
                paid INTEGER NOT NULL DEFAULT 0,
                open INTEGER NOT NULL DEFAULT 1 CHECK(open IN (0, 1)),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_trips_subject ON trips(subject_id, created_at);
        ",
    },
    Migration {
        version: 2,
        name: "one open trip per subject",
        sql: "
            CREATE UNIQUE INDEX IF NOT EXISTS idx_trips_one_open
                ON trips(subject_id) WHERE open = 1;
        ",
    },
];

/// Latest schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Apply every migration newer than the stored version
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current = schema_version(conn)?;
    if current >= SCHEMA_VERSION {
        debug!(version = current, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(conn, migration).map_err(|e| {
            error!(version = migration.version, name = migration.name, error = %e, "Migration failed");
            DatabaseError::Migration(format!("V{:03} ({}): {e}", migration.version, migration.name))
        })?;
        debug!(version = migration.version, name = migration.name, "Migration applied");
    }

    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

fn apply(conn: &Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [migration.version],
    )?;
    tx.commit()
}

/// Stored schema version, creating the tracking table on first use
pub fn schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        [],
    )?;
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

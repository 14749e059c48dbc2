//! Online backup of the trip database
//!
//! Uses SQLite's backup API so the server can keep writing while the copy
//! is taken.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{debug, info};

/// Result of a backup operation
#[derive(Debug)]
pub struct BackupResult {
    pub local_path: PathBuf,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

/// Default file name for a backup taken now
pub fn default_backup_path() -> PathBuf {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("tollgate_backup_{timestamp}.db"))
}

/// Copy the database at `source` to `output`
pub async fn backup_database(source: &Path, output: Option<PathBuf>) -> Result<BackupResult> {
    if source.as_os_str() == ":memory:" {
        bail!("An in-memory database cannot be backed up");
    }
    if !source.exists() {
        bail!("Database not found: {}", source.display());
    }

    let start = Instant::now();
    let backup_path = output.unwrap_or_else(default_backup_path);

    info!(
        source = %source.display(),
        destination = %backup_path.display(),
        "Starting SQLite online backup"
    );

    perform_sqlite_backup(source, &backup_path)
        .await
        .context("SQLite backup failed")?;

    let size_bytes = tokio::fs::metadata(&backup_path)
        .await
        .context("Failed to read backup file metadata")?
        .len();

    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;

    Ok(BackupResult {
        local_path: backup_path,
        size_bytes,
        duration_ms,
    })
}

async fn perform_sqlite_backup(source_path: &Path, dest_path: &Path) -> Result<()> {
    let source_path = source_path.to_path_buf();
    let dest_path = dest_path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        use rusqlite::{Connection, OpenFlags, backup};

        let source_conn = Connection::open_with_flags(
            &source_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open source database")?;
        let mut dest_conn = Connection::open(&dest_path).context("Failed to create backup file")?;

        {
            let backup = backup::Backup::new(&source_conn, &mut dest_conn)
                .context("Failed to initialize backup")?;
            backup.step(-1).context("Backup step failed")?;
            debug!("All pages copied");
        }

        dest_conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close backup file")?;
        Ok(())
    })
    .await
    .context("Backup task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copies_trip_table() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("trips.db");
        {
            let conn = rusqlite::Connection::open(&source).unwrap();
            conn.execute_batch(
                "CREATE TABLE trips (id TEXT PRIMARY KEY); INSERT INTO trips VALUES ('t1');",
            )
            .unwrap();
        }

        let dest = dir.path().join("copy.db");
        let result = backup_database(&source, Some(dest.clone())).await.unwrap();
        assert_eq!(result.local_path, dest);
        assert!(result.size_bytes > 0);

        let conn = rusqlite::Connection::open(&dest).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = backup_database(&dir.path().join("absent.db"), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn in_memory_source_fails() {
        assert!(backup_database(Path::new(":memory:"), None).await.is_err());
    }

    #[test]
    fn default_path_is_timestamped() {
        let path = default_backup_path();
        let name = path.to_string_lossy();
        assert!(name.starts_with("tollgate_backup_"));
        assert!(name.ends_with(".db"));
    }
}

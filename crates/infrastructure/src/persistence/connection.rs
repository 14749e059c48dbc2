//! SQLite connection pool for the trip store
//!
//! Every pooled connection gets the same pragmas; migrations run once when
//! the pool is built.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Cannot create database directory: {0}")]
    Directory(#[from] std::io::Error),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Path value selecting a private in-memory database
const IN_MEMORY: &str = ":memory:";

/// Build the pool described by `config`
///
/// An in-memory database exists once per connection, so its pool is capped
/// at a single connection regardless of `max_connections` and that
/// connection is never retired.
pub fn create_pool(config: &DatabaseConfig) -> Result<ConnectionPool, DatabaseError> {
    let in_memory = config.path == IN_MEMORY;
    let max_size = if in_memory { 1 } else { config.max_connections.max(1) };
    info!(path = %config.path, max_size, "Opening trip database");

    let manager = if in_memory {
        SqliteConnectionManager::memory()
    } else {
        ensure_parent_dir(Path::new(&config.path))?;
        SqliteConnectionManager::file(&config.path)
    };

    let mut builder = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(PragmaCustomizer));
    if in_memory {
        // Recycling the only connection would drop the whole database.
        builder = builder.max_lifetime(None).idle_timeout(None);
    }
    let pool = builder.build(manager)?;

    if config.run_migrations {
        super::migrations::run_migrations(&*pool.get()?)?;
    }

    debug!("Trip database ready");
    Ok(pool)
}

fn ensure_parent_dir(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Applies connection-level settings to every pooled connection
#[derive(Debug)]
struct PragmaCustomizer;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        initialize_connection(conn)
    }
}

fn initialize_connection(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
}

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::errors::{Result, StashError};

pub mod folders;
pub mod prompts;
pub mod schema;

/// Handle to one open prompt database.
///
/// Owned by the caller and passed to every operation, so tests and tools can
/// run isolated stores side by side. Dropping the handle closes the pool.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// Failure here is fatal for the session: a corrupted file or a
    /// conflicting consumer holding an incompatible schema is surfaced to
    /// the caller and never retried.
    pub async fn open(path: &str) -> Result<Store> {
        // Create directory if it doesn't exist
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await
                    .map_err(|e| anyhow::anyhow!("Failed to create database directory: {}", e))?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await?;

        // Run schema migration
        // Split by semicolon to run multiple statements
        for statement in schema::SCHEMA.split(';') {
            if statement.trim().is_empty() {
                continue;
            }
            sqlx::query(statement).execute(&pool).await?;
        }

        log::debug!("prompt store opened at {}", path);

        Ok(Store { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Map a primary-key collision on insert to an integrity error.
///
/// Version ids come from a collision-resistant generator, so a duplicate key
/// means corrupted or re-imported data rather than a retryable condition.
pub(crate) fn map_insert_err(err: sqlx::Error, what: &str, id: &str) -> StashError {
    let duplicate_key = matches!(
        &err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    );

    if duplicate_key {
        StashError::Integrity(format!("duplicate {} id: {}", what, id))
    } else {
        StashError::Database(err)
    }
}

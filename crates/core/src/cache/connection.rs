//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying required pragmas
//! for performance and concurrency (WAL mode), and running migrations.

use super::migrations;
use crate::Error;
use crate::config::CacheConfig;
use std::path::Path;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA busy_timeout=5000;";

/// Rating cache handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Cloning is cheap and all clones share the
/// same connection, so statements from concurrent callers are serialized
/// by that thread.
#[derive(Clone, Debug)]
pub struct RatingCache {
    pub(crate) conn: Connection,
    pub(crate) ttl_seconds: i64,
}

impl RatingCache {
    /// Open the cache described by `config`.
    ///
    /// Creates the parent directory and the database file if needed.
    pub async fn open(config: &CacheConfig) -> Result<Self, Error> {
        if let Some(parent) = config.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::MigrationFailed(format!("cannot create {}: {e}", parent.display())))?;
        }

        Self::open_path(&config.db_path, config.ttl_seconds).await
    }

    /// Open a database at the specified path with the given TTL.
    ///
    /// Applies performance pragmas and runs any pending migrations.
    pub async fn open_path(path: impl AsRef<Path>, ttl_seconds: i64) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::configure(conn, ttl_seconds).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory(ttl_seconds: i64) -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::configure(conn, ttl_seconds).await
    }

    async fn configure(conn: Connection, ttl_seconds: i64) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        let cache = Self { conn, ttl_seconds };
        cache.initialize().await?;

        tracing::debug!(ttl_seconds, "rating cache ready");
        Ok(cache)
    }

    /// Ensure the schema exists.
    ///
    /// Idempotent: pending migrations are applied, existing rows are untouched.
    pub async fn initialize(&self) -> Result<(), Error> {
        migrations::run(&self.conn).await
    }

    /// Configured time-to-live in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = RatingCache::open_in_memory(3600).await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
        assert_eq!(db.ttl_seconds(), 3600);
    }

    #[tokio::test]
    async fn test_open_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!("pagepulse-test-{}", std::process::id()));
        let config = CacheConfig { db_path: dir.join("nested").join("ratings.sqlite"), ttl_seconds: 60 };

        let db = RatingCache::open(&config).await.unwrap();
        db.initialize().await.unwrap();
        assert!(config.db_path.exists());

        drop(db);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! The history database: one SQLite file holding the snapshot log.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// Page reads run alongside at most a refresh or two.
const MAX_CONNECTIONS: u32 = 4;
// A refresh writes one chart (at most 50 rows), so a queued writer never
// waits long for the lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
// The log only grows; truncate the WAL after checkpoints instead of letting
// it keep its high-water size.
const WAL_SIZE_LIMIT: &str = "4194304";

/// Connection pool for the snapshot history.
///
/// Pass it (or a [`Repository`](crate::Repository) made from it) to whoever
/// needs it; there is no global connection.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the history file at `path`, creating the file (not its parent
    /// directory) and schema when missing.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("journal_size_limit", WAL_SIZE_LIMIT)
            .busy_timeout(BUSY_TIMEOUT)
            .optimize_on_close(true, 400);
        Self::open(options, MAX_CONNECTIONS).await
    }

    /// A private in-memory history, gone once the pool closes. Not gated on
    /// `cfg(test)` so that other crates' tests can use it.
    pub async fn connect_in_memory() -> Result<Self> {
        // Every connection to ":memory:" is its own database, so stay on one.
        let options = SqliteConnectOptions::new().filename(":memory:");
        Self::open(options, 1).await
    }

    async fn open(options: SqliteConnectOptions, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        MIGRATOR.run(&pool).await.or_raise(|| ErrorKind::Migration)?;
        Ok(Self { pool })
    }

    /// Start a transaction that holds the write lock from its first
    /// statement. A concurrent writer waits on the busy timeout instead of
    /// failing when it upgrades a stale read.
    pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
        pool.begin_with("BEGIN IMMEDIATE").await.or_raise(|| ErrorKind::Database)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for checked-out connections and close them all.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = Database::connect_in_memory().await.unwrap();
        let tables: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE name = 'video_snapshots'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(tables.0, 1);
        db.close().await;
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(dir.path().join("history.sqlite")).await.unwrap();
        let mode: (String,) = sqlx::query_as("PRAGMA journal_mode").fetch_one(db.pool()).await.unwrap();
        assert_eq!(mode.0, "wal");
        let limit: (i64,) = sqlx::query_as("PRAGMA journal_size_limit").fetch_one(db.pool()).await.unwrap();
        assert_eq!(limit.0, 4_194_304);
        let timeout: (i64,) = sqlx::query_as("PRAGMA busy_timeout").fetch_one(db.pool()).await.unwrap();
        assert_eq!(timeout.0, 5_000);
        db.close().await;
    }

    #[tokio::test]
    async fn test_write_transaction_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(dir.path().join("history.sqlite")).await.unwrap();
        let mut tx = Database::begin_write(db.pool()).await.unwrap();
        sqlx::query("CREATE TABLE scratch (n INTEGER)").execute(&mut *tx).await.unwrap();
        tx.rollback().await.unwrap();
        let tables: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE name = 'scratch'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(tables.0, 0);
        db.close().await;
    }

    #[tokio::test]
    async fn test_reconnect_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.sqlite");
        Database::connect(&path).await.unwrap().close().await;
        assert!(path.exists());
        Database::connect(&path).await.unwrap().close().await;
    }

    #[tokio::test]
    async fn test_connect_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does/not/exist/history.sqlite");
        let err = Database::connect(&path).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Database);
    }
}

use crate::error::{Result, StorageError};
use crate::visit::{VisitRecord, VisitStore};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};
use tripgate_core::NormalizedHost;

const MAX_CONNECTIONS: u32 = 4;

/// SQLite implementation of the visit store.
///
/// Visits go to a single `visits` table, created on connect if missing.
/// Timestamps are stored as unix seconds.
#[derive(Debug, Clone)]
pub struct SqliteVisitStore {
    pool: SqlitePool,
}

impl SqliteVisitStore {
    /// Creates a store from an existing pool. The schema is not touched.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database file at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!(path = %path.display(), "Visit store ready");
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to one connection that never expires, since each
    /// SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS visits (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                url       TEXT    NOT NULL,
                timestamp INTEGER NOT NULL,
                country   TEXT    NOT NULL,
                city      TEXT    NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS visits_url_idx ON visits (url)")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn to_count(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| StorageError::InvalidData(format!("negative count {value}")))
}

#[async_trait]
impl VisitStore for SqliteVisitStore {
    async fn record(&self, visit: &VisitRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO visits (url, timestamp, country, city)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(visit.host.as_str())
        .bind(visit.at.as_second())
        .bind(&visit.country)
        .bind(&visit.city)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(host = %visit.host, "Visit recorded");
        Ok(())
    }

    async fn count_for(&self, host: &NormalizedHost) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM visits WHERE url = ?")
            .bind(host.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        to_count(row.try_get("n").map_err(map_sqlx_error)?)
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM visits")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        to_count(row.try_get("n").map_err(map_sqlx_error)?)
    }
}

//! ValveStore - pooled SQLite storage
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS valve (
//!     pk_valve    INTEGER PRIMARY KEY AUTOINCREMENT,
//!     name        VARCHAR(140) NOT NULL UNIQUE,
//!     description VARCHAR(200) NOT NULL,
//!     type        VARCHAR(140) NOT NULL,
//!     flow_rate   REAL NOT NULL
//! );
//! ```

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::errors::{StorageError, StorageResult};
use super::session::Session;

/// Table definition, applied when a store is opened.
pub const SCHEMA_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS valve (
        pk_valve    INTEGER PRIMARY KEY AUTOINCREMENT,
        name        VARCHAR(140) NOT NULL UNIQUE,
        description VARCHAR(200) NOT NULL,
        type        VARCHAR(140) NOT NULL,
        flow_rate   REAL NOT NULL
    )
"#;

/// Pool sizing for [`ValveStore::connect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Shared handle to the valve table.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct ValveStore {
    pool: SqlitePool,
}

impl ValveStore {
    /// Open (creating if needed) the database at `database_url` and make sure
    /// the `valve` table exists.
    ///
    /// # Example
    /// ```ignore
    /// let store = ValveStore::connect("sqlite://valves.db", StoreOptions::default()).await?;
    /// ```
    pub async fn connect(database_url: &str, options: StoreOptions) -> StorageResult<Self> {
        if database_url.trim().is_empty() {
            return Err(StorageError::InvalidUrl("database url is empty".to_string()));
        }

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::InvalidUrl(format!("{database_url}: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_with(connect_options)
            .await?;

        tracing::debug!(database_url, "opened valve store");
        Self::from_pool(pool).await
    }

    /// Open a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` is its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> StorageResult<Self> {
        let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the table if it is missing.
    pub async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> StorageResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Begin a unit of work.
    ///
    /// The returned session owns a pooled connection until it is committed
    /// or dropped.
    pub async fn session(&self) -> StorageResult<Session> {
        let tx = self.pool.begin().await?;
        Ok(Session::new(tx))
    }

    /// Round-trip a trivial query through a fresh session.
    pub async fn ping(&self) -> StorageResult<()> {
        let mut session = self.session().await?;
        session.ping().await
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

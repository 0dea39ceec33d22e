//! # Database Pool Management
//!
//! Owns the SQLite pool that every request shares.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Connections per request                            │
//! │                                                                         │
//! │  DbConfig ──► connect_options() ──► SqlitePool (max_connections)       │
//! │                                          │                              │
//! │            ┌─────────────────────────────┼──────────────────────┐      │
//! │            ▼                             ▼                      ▼      │
//! │  SubmitOrder                   ResolveApproval          ListApprovals  │
//! │  db.begin() holds one          db.begin() holds one     repository     │
//! │  connection until commit,      connection, waits on     borrows one    │
//! │  rollback or drop              busy_timeout if another  per query      │
//! │                                writer holds the lock                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing reaches a connection except through a repository or a
//! [`DbTransaction`].

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{ApprovalRepository, ProductRepository, SaleRepository};
use crate::transaction::DbTransaction;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Pool and connection settings.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/orderdesk/orderdesk.db")
///     .max_connections(8)
///     .busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// How long `begin()` and repository calls wait for a free connection.
    pub connect_timeout: Duration,

    /// How long a writer waits on SQLite's database lock before failing.
    pub busy_timeout: Duration,

    /// `None` keeps idle connections open forever.
    pub idle_timeout: Option<Duration>,

    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed configuration. The file is created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Private in-memory database for tests.
    ///
    /// One connection that never idles out: the database lives exactly as
    /// long as that connection. An open transaction blocks every other
    /// query, so tests also prove workflows never touch the pool
    /// mid-transaction.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Floors at one connection.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }

    /// Per-connection SQLite settings.
    ///
    /// Files use WAL with NORMAL sync; foreign keys are always on since
    /// `sale_lines` references `sales`.
    pub fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        Ok(options
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the pool, handing out repositories and transaction scopes.
///
/// Clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and applies pending migrations unless disabled.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        let options = config.connect_options()?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.idle_timeout.map(|_| Duration::from_secs(1800)))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(in_memory = config.is_in_memory(), "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Database schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    pub fn approvals(&self) -> ApprovalRepository {
        ApprovalRepository::new(self.pool.clone())
    }

    /// Opens a transaction scope holding one pooled connection.
    ///
    /// The connection returns to the pool on commit, rollback or drop.
    /// Dropping without commit rolls back.
    pub async fn begin(&self) -> DbResult<DbTransaction> {
        DbTransaction::begin(&self.pool).await
    }

    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/orderdesk-test.db")
            .max_connections(10)
            .connect_timeout(Duration::from_secs(3))
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());

        assert_eq!(DbConfig::new("x.db").max_connections(0).max_connections, 1);
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_file_database_persists_across_pools() {
        let path = std::env::temp_dir().join(format!("orderdesk-{}.db", uuid::Uuid::new_v4()));

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            db.products().register("A", "Widget", 100, 90).await.unwrap();
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 1);
        db.close().await;

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }
}

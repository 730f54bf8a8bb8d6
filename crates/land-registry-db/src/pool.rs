//! SQLite pool setup
//!
//! A file database runs in WAL mode so readers are not blocked by the single
//! writer. `sqlite::memory:` gives every connection its own empty database,
//! so an in-memory pool holds exactly one connection that is never recycled.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Ten minutes
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Thirty minutes
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// URL of a private in-memory database
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Registry file used when no URL is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite://land_registry.db";

/// Pool settings, built with chained setters
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// `sqlite://path/to/file.db` or `sqlite::memory:`
    pub database_url: String,

    pub min_connections: u32,
    pub max_connections: u32,

    /// How long to wait for a free connection
    pub connect_timeout: Duration,

    /// Ignored for in-memory databases
    pub idle_timeout: Option<Duration>,

    /// Ignored for in-memory databases
    pub max_lifetime: Option<Duration>,

    /// Log every statement at debug level
    pub enable_logging: bool,

    /// Apply embedded migrations once the pool is up
    pub run_migrations: bool,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)),
            max_lifetime: Some(Duration::from_secs(DEFAULT_MAX_LIFETIME_SECS)),
            enable_logging: false,
            run_migrations: true,
        }
    }

    /// Throwaway registry for tests and demos
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_URL)
            .min_connections(1)
            .max_connections(1)
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = Some(lifetime);
        self
    }

    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Whether the URL points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Reject settings the pool could never satisfy
    pub fn validate(&self) -> DbResult<()> {
        if self.database_url.is_empty() {
            return Err(DbError::Configuration(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(DbError::Configuration(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(DbError::Configuration(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }

        if self.is_in_memory() && self.max_connections != 1 {
            return Err(DbError::Configuration(format!(
                "an in-memory registry needs exactly one connection, got max_connections = {}",
                self.max_connections
            )));
        }

        Ok(())
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.database_url)
            .map_err(|e| DbError::Configuration(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let options = if self.is_in_memory() {
            options
        } else {
            options.journal_mode(SqliteJournalMode::Wal)
        };

        Ok(if self.enable_logging {
            options.log_statements(tracing::log::LevelFilter::Debug)
        } else {
            options.disable_statement_logging()
        })
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout);

        if self.is_in_memory() {
            // Dropping the connection would drop the database with it
            options.idle_timeout(None).max_lifetime(None)
        } else {
            options
                .idle_timeout(self.idle_timeout)
                .max_lifetime(self.max_lifetime)
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

/// Open the pool, apply migrations if configured and run a probe query
pub async fn create_pool(config: &PoolConfig) -> DbResult<SqlitePool> {
    config.validate()?;

    info!(
        database = %config.database_url,
        min = config.min_connections,
        max = config.max_connections,
        "Opening registry database"
    );

    let pool = config
        .pool_options()
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    verify_pool_health(&pool).await?;

    info!("Registry database ready");
    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!("Applying registry migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::Migration(format!("Migration failed: {}", e)))?;

    info!("Registry schema is up to date");
    Ok(())
}

/// Round-trip a trivial query through the pool
pub async fn verify_pool_health(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| DbError::Connection(format!("Health check failed: {}", e)))?;

    debug!("Database probe succeeded");
    Ok(())
}

/// Snapshot of pool occupancy
pub fn get_pool_stats(pool: &SqlitePool) -> PoolStats {
    PoolStats {
        total_connections: pool.size(),
        idle_connections: pool.num_idle() as u32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub total_connections: u32,
    pub idle_connections: u32,
}

impl PoolStats {
    /// Connections currently checked out
    pub fn active_connections(&self) -> u32 {
        self.total_connections.saturating_sub(self.idle_connections)
    }
}

/// Wait for checked-out connections to return, then close them all
pub async fn close_pool(pool: SqlitePool) {
    debug!("Closing registry database");
    pool.close().await;
    info!("Registry database closed");
}

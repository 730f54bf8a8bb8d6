//! Database layer for the Land Registry
//!
//! This crate provides database persistence for the Land Registry, including:
//! - Connection pool management with SQLx
//! - The `RegistryRepository` trait over assets, history and evidence
//! - A SQLite implementation with transactional writes
//! - Embedded database migrations
//!
//! # Features
//!
//! - **Atomic writes**: an asset and its genesis version commit together or not at all
//! - **Append-only history**: enforced by triggers on the history and evidence tables
//! - **Connection pooling**: configurable pools, including a pinned in-memory mode for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use land_registry_db::{create_pool, PoolConfig, SqliteRegistryRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PoolConfig::new("sqlite://land_registry.db").max_connections(5);
//! let pool = create_pool(&config).await?;
//!
//! let repo = SqliteRegistryRepository::new(pool);
//! # Ok(())
//! # }
//! ```

// Re-export core domain types for convenience
pub use land_registry_core;

// Public modules
pub mod error;
pub mod pool;
pub mod repository;
pub mod sqlite;

// Re-exports for convenience
pub use error::{DbError, DbResult};
pub use pool::{
    close_pool, create_pool, get_pool_stats, run_migrations, verify_pool_health, PoolConfig,
    PoolStats, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_IDLE_TIMEOUT_SECS,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_LIFETIME_SECS, DEFAULT_MIN_CONNECTIONS, IN_MEMORY_URL,
};
pub use repository::{RegistryRepository, RegistryStats};
pub use sqlite::SqliteRegistryRepository;

// Re-export sqlx types that users may need
pub use sqlx::sqlite::SqlitePool;

/// Database layer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_url_is_a_file_database() {
        assert!(!PoolConfig::new(DEFAULT_DATABASE_URL).is_in_memory());
        assert!(PoolConfig::new(IN_MEMORY_URL).is_in_memory());
    }
}

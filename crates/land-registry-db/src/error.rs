//! Storage errors
//!
//! SQLite reports constraint failures through extended result codes. They
//! are folded into a small set of variants so the service layer can tell a
//! missing parent row from a rejected write or an unreachable database.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DbError>;

/// `SQLITE_CONSTRAINT_TRIGGER`, raised by `RAISE(ABORT, ...)` in a trigger
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Migration error: {0}")]
    Migration(String),

    /// The transaction could not be committed
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// The asset a write refers to does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// CHECK, NOT NULL, or an append-only trigger rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A stored row could not be decoded into a domain type
    #[error("Invalid data format: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }

    /// Whether the database refused the write because of a schema rule
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::ConstraintViolation(_)
                | DbError::ForeignKeyViolation(_)
                | DbError::UniqueViolation(_)
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound("No rows returned".to_string()),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER) {
                    return DbError::ConstraintViolation(message);
                }
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation(message),
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation(message),
                    ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                        DbError::ConstraintViolation(message)
                    }
                    _ => DbError::Query(message),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::Pool("Connection pool timeout".to_string()),
            sqlx::Error::PoolClosed => DbError::Pool("Connection pool closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::Connection(format!("I/O error: {}", io_err)),
            sqlx::Error::Configuration(cfg_err) => DbError::Configuration(cfg_err.to_string()),

            sqlx::Error::ColumnNotFound(col) => {
                DbError::InvalidData(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::InvalidData(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(msg) => DbError::InvalidData(format!("Decode error: {}", msg)),

            sqlx::Error::Migrate(migrate_err) => DbError::Migration(migrate_err.to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

//! Service errors
//!
//! Four outcomes reach callers: the asset is missing, the input was
//! rejected, the store failed, or something unexpected happened. Storage
//! details are folded into those so the HTTP layer maps them without
//! knowing about SQLite.

use land_registry_core::RegistryError;
use land_registry_db::DbError;
use thiserror::Error;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The unit of work was rolled back
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn asset_not_found(id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("asset {}", id))
    }
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::ValidationError(msg) => ServiceError::ValidationFailed(msg),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            // A foreign key only fails when the parent asset is gone
            DbError::NotFound(msg) | DbError::ForeignKeyViolation(msg) => {
                ServiceError::NotFound(msg)
            }
            // Input is validated before it reaches the store; a schema rejection is an integrity failure
            DbError::ConstraintViolation(msg)
            | DbError::UniqueViolation(msg)
            | DbError::Connection(msg)
            | DbError::Pool(msg)
            | DbError::Query(msg)
            | DbError::Transaction(msg)
            | DbError::InvalidData(msg)
            | DbError::Migration(msg) => ServiceError::Storage(msg),
            DbError::Configuration(msg) | DbError::Internal(msg) => ServiceError::Internal(msg),
        }
    }
}

//! Registry error taxonomy

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Malformed or out-of-range input; nothing was written
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl RegistryError {
    /// Validation failure on a named field, rendered as `field: message`
    pub fn invalid(field: &str, message: impl std::fmt::Display) -> Self {
        RegistryError::ValidationError(format!("{}: {}", field, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_includes_field() {
        let err = RegistryError::invalid("location_lat", "must be between -90 and 90");
        assert_eq!(
            err.to_string(),
            "Validation error: location_lat: must be between -90 and 90"
        );
    }
}

//! Field-level input checks shared by the domain constructors

use crate::error::{RegistryError, Result};

/// Maximum length of asset names, owners and version snapshots
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of an evidence category
pub const MAX_EVIDENCE_TYPE_LEN: usize = 100;

/// Maximum length of a change reason
pub const MAX_CHANGE_REASON_LEN: usize = 500;

/// Require a non-blank string no longer than `max_len` characters
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::invalid(field, "cannot be empty"));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(RegistryError::invalid(
            field,
            format!("cannot exceed {} characters (got {})", max_len, len),
        ));
    }
    Ok(())
}

/// Require a non-blank string with no upper bound
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::invalid(field, "cannot be empty"));
    }
    Ok(())
}

/// Latitude must lie in [-90, 90]
pub fn require_latitude(field: &str, value: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&value) {
        return Err(RegistryError::invalid(
            field,
            format!("must be between -90 and 90, got {}", value),
        ));
    }
    Ok(())
}

/// Longitude must lie in [-180, 180]
pub fn require_longitude(field: &str, value: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&value) {
        return Err(RegistryError::invalid(
            field,
            format!("must be between -180 and 180, got {}", value),
        ));
    }
    Ok(())
}

/// Strictly positive, finite quantity
pub fn require_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RegistryError::invalid(
            field,
            format!("must be greater than 0, got {}", value),
        ));
    }
    Ok(())
}

//! Land parcel types
//!
//! An [`Asset`] is the current state of a parcel. It is never edited in
//! place: creation goes through [`NewAsset`] together with a genesis history
//! row, and every later edit goes through [`AssetChange`], which always
//! produces a new history row alongside the update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::types::AssetId;
use crate::validation::{
    require_latitude, require_longitude, require_positive, require_text, MAX_CHANGE_REASON_LEN,
    MAX_NAME_LEN,
};
use crate::version::GENESIS_REASON;

/// A registered land parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier, assigned by storage
    pub id: AssetId,

    /// Human-readable parcel name
    pub name: String,

    /// Current owner
    pub owner: String,

    /// Latitude of the parcel reference point
    pub location_lat: f64,

    /// Longitude of the parcel reference point
    pub location_lon: f64,

    /// Area in hectares
    pub size_hectares: f64,

    /// When the parcel was registered; never changes
    pub created_at: DateTime<Utc>,
}

/// Validated input for registering a parcel
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub name: String,
    pub owner: String,
    pub location_lat: f64,
    pub location_lon: f64,
    pub size_hectares: f64,
}

impl NewAsset {
    /// Build and validate a new parcel description
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        location_lat: f64,
        location_lon: f64,
        size_hectares: f64,
    ) -> Result<Self> {
        let asset = Self {
            name: name.into(),
            owner: owner.into(),
            location_lat,
            location_lon,
            size_hectares,
        };
        asset.validate()?;
        Ok(asset)
    }

    /// Check every field against its domain constraint
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name, MAX_NAME_LEN)?;
        require_text("owner", &self.owner, MAX_NAME_LEN)?;
        require_latitude("location_lat", self.location_lat)?;
        require_longitude("location_lon", self.location_lon)?;
        require_positive("size_hectares", self.size_hectares)?;
        Ok(())
    }
}

/// Validated input for a recorded change of name and/or owner
#[derive(Debug, Clone, PartialEq)]
pub struct AssetChange {
    pub name: String,
    pub owner: String,
    pub change_reason: String,
}

impl AssetChange {
    /// Build and validate a change
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        change_reason: impl Into<String>,
    ) -> Result<Self> {
        let change = Self {
            name: name.into(),
            owner: owner.into(),
            change_reason: change_reason.into(),
        };
        change.validate()?;
        Ok(change)
    }

    /// Check every field; the genesis reason is reserved for creation
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name, MAX_NAME_LEN)?;
        require_text("owner", &self.owner, MAX_NAME_LEN)?;
        require_text("change_reason", &self.change_reason, MAX_CHANGE_REASON_LEN)?;
        if self.change_reason.trim() == GENESIS_REASON {
            return Err(RegistryError::invalid(
                "change_reason",
                format!("'{}' is reserved for asset creation", GENESIS_REASON),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_asset_valid() {
        let asset = NewAsset::new("Plot A", "Owner X", -17.8, 31.0, 5.0).unwrap();
        assert_eq!(asset.name, "Plot A");
        assert_eq!(asset.owner, "Owner X");
    }

    #[test]
    fn test_new_asset_rejects_out_of_range_latitude() {
        let err = NewAsset::new("Plot A", "Owner X", 91.0, 31.0, 5.0).unwrap_err();
        assert!(matches!(err, RegistryError::ValidationError(_)));
        assert!(err.to_string().contains("location_lat"));
    }

    #[test]
    fn test_new_asset_rejects_non_positive_size() {
        assert!(NewAsset::new("Plot A", "Owner X", 0.0, 0.0, 0.0).is_err());
        assert!(NewAsset::new("Plot A", "Owner X", 0.0, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_new_asset_rejects_blank_owner() {
        let err = NewAsset::new("Plot A", "", 0.0, 0.0, 1.0).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_change_rejects_genesis_reason() {
        let err = AssetChange::new("Plot A", "Owner Y", GENESIS_REASON).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_change_requires_reason() {
        assert!(AssetChange::new("Plot A", "Owner Y", "").is_err());
        assert!(AssetChange::new("Plot A", "Owner Y", "Sale to Owner Y").is_ok());
    }

    #[test]
    fn test_asset_wire_format() {
        let asset = Asset {
            id: AssetId::new(1),
            name: "Plot A".to_string(),
            owner: "Owner X".to_string(),
            location_lat: -17.8,
            location_lon: 31.0,
            size_hectares: 5.0,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["size_hectares"], 5.0);
        assert!(value["created_at"].is_string());
    }
}

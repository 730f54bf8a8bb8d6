//! Data Transfer Objects (DTOs) for service layer
//!
//! This module defines request and response types used at service boundaries,
//! separating internal domain models from external interfaces. Field names
//! are the wire names clients send.

use land_registry_core::{
    Asset, AssetChange, AssetId, AssetVersion, NewAsset, NewEvidence, Page, RegistryError,
    DEFAULT_PAGE_LIMIT,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Registration DTOs
// ============================================================================

/// Request to register a new land parcel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssetRequest {
    pub name: String,
    pub owner: String,
    pub location_lat: f64,
    pub location_lon: f64,
    pub size_hectares: f64,
}

impl TryFrom<CreateAssetRequest> for NewAsset {
    type Error = RegistryError;

    fn try_from(request: CreateAssetRequest) -> Result<Self, Self::Error> {
        NewAsset::new(
            request.name,
            request.owner,
            request.location_lat,
            request.location_lon,
            request.size_hectares,
        )
    }
}

/// Request to change an asset's name and/or owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordChangeRequest {
    pub name: String,
    pub owner: String,
    pub change_reason: String,
}

impl TryFrom<RecordChangeRequest> for AssetChange {
    type Error = RegistryError;

    fn try_from(request: RecordChangeRequest) -> Result<Self, Self::Error> {
        AssetChange::new(request.name, request.owner, request.change_reason)
    }
}

/// Result of a recorded change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordChangeResponse {
    /// Asset state after the change
    pub asset: Asset,

    /// History row appended for the change
    pub version: AssetVersion,
}

// ============================================================================
// Evidence DTOs
// ============================================================================

/// Request to log evidence against an asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvidenceRequest {
    pub asset_id: AssetId,
    pub evidence_type: String,
    pub description: String,
    pub gps_lat: f64,
    pub gps_lon: f64,
}

impl TryFrom<LogEvidenceRequest> for NewEvidence {
    type Error = RegistryError;

    fn try_from(request: LogEvidenceRequest) -> Result<Self, Self::Error> {
        NewEvidence::new(
            request.asset_id,
            request.evidence_type,
            request.description,
            request.gps_lat,
            request.gps_lon,
        )
    }
}

// ============================================================================
// Listing DTOs
// ============================================================================

/// Offset pagination parameters (`?skip=0&limit=100`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Number of rows to skip
    #[serde(default)]
    pub skip: i64,

    /// Maximum number of rows to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl ListParams {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }

    /// Validate into a storage page
    pub fn page(&self) -> Result<Page, RegistryError> {
        Page::new(self.skip, self.limit)
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_wire_names() {
        let request: CreateAssetRequest = serde_json::from_str(
            r#"{"name":"Plot A","owner":"Owner X","location_lat":-17.8,"location_lon":31.0,"size_hectares":5.0}"#,
        )
        .unwrap();

        let asset = NewAsset::try_from(request).unwrap();
        assert_eq!(asset.name, "Plot A");
        assert_eq!(asset.size_hectares, 5.0);
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateAssetRequest {
            name: "Plot A".to_string(),
            owner: "Owner X".to_string(),
            location_lat: 91.0,
            location_lon: 0.0,
            size_hectares: 1.0,
        };
        assert!(NewAsset::try_from(request).is_err());
    }

    #[test]
    fn test_evidence_request_conversion() {
        let request: LogEvidenceRequest = serde_json::from_str(
            r#"{"asset_id":1,"evidence_type":"Photo","description":"fence built","gps_lat":-17.8,"gps_lon":31.0}"#,
        )
        .unwrap();

        let evidence = NewEvidence::try_from(request).unwrap();
        assert_eq!(evidence.asset_id, AssetId::new(1));
    }

    #[test]
    fn test_list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, ListParams::default());
        assert_eq!(params.limit, 100);

        let page = ListParams::new(5, 10).page().unwrap();
        assert_eq!(page.offset(), 5);
        assert_eq!(page.limit(), 10);

        assert!(ListParams::new(-1, 10).page().is_err());
    }
}

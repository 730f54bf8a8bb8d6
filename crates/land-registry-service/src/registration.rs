//! Registration service
//!
//! This module provides the write side of the registry: registering parcels
//! together with their genesis history row, recording changes, and logging
//! evidence. Input is validated before any storage call is made.

use async_trait::async_trait;
use land_registry_core::{Asset, AssetChange, AssetId, Evidence, NewAsset, NewEvidence, NewVersion};
use land_registry_db::RegistryRepository;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::dto::{CreateAssetRequest, LogEvidenceRequest, RecordChangeRequest, RecordChangeResponse};
use crate::error::ServiceResult;

/// Trait for registry write operations
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new asset and its genesis version in one unit of work
    async fn create_asset(&self, request: CreateAssetRequest) -> ServiceResult<Asset>;

    /// Change an asset's name and/or owner, appending a history row
    async fn record_change(
        &self,
        asset_id: AssetId,
        request: RecordChangeRequest,
    ) -> ServiceResult<RecordChangeResponse>;

    /// Attach an evidence record to an existing asset
    async fn log_evidence(&self, request: LogEvidenceRequest) -> ServiceResult<Evidence>;
}

/// Default implementation of RegistrationService
pub struct DefaultRegistrationService {
    repository: Arc<dyn RegistryRepository>,
}

impl DefaultRegistrationService {
    /// Create a new registration service
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RegistrationService for DefaultRegistrationService {
    #[instrument(skip(self, request), fields(asset_name = %request.name))]
    async fn create_asset(&self, request: CreateAssetRequest) -> ServiceResult<Asset> {
        let asset = NewAsset::try_from(request)?;
        let genesis = NewVersion::genesis(&asset);

        let (stored, version) = self.repository.create_asset(&asset, &genesis).await?;

        info!(
            asset_id = %stored.id,
            version_id = %version.id,
            "Registered asset {}",
            stored.name
        );
        Ok(stored)
    }

    #[instrument(skip(self, request), fields(asset_id = %asset_id))]
    async fn record_change(
        &self,
        asset_id: AssetId,
        request: RecordChangeRequest,
    ) -> ServiceResult<RecordChangeResponse> {
        let change = AssetChange::try_from(request)?;
        let version = NewVersion::from_change(&change);

        let (asset, version) = self.repository.record_change(asset_id, &version).await?;

        info!(version_id = %version.id, "Recorded change: {}", version.change_reason);
        Ok(RecordChangeResponse { asset, version })
    }

    #[instrument(skip(self, request), fields(asset_id = %request.asset_id))]
    async fn log_evidence(&self, request: LogEvidenceRequest) -> ServiceResult<Evidence> {
        let evidence = NewEvidence::try_from(request)?;

        debug!(evidence_type = %evidence.evidence_type, "Logging evidence");
        let stored = self.repository.insert_evidence(&evidence).await?;

        info!(evidence_id = %stored.id, "Logged evidence");
        Ok(stored)
    }
}

//! Search service
//!
//! Read-only queries over assets, their history and evidence.

use async_trait::async_trait;
use land_registry_core::{Asset, AssetId, AssetVersion, Evidence};
use land_registry_db::{RegistryRepository, RegistryStats};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::dto::ListParams;
use crate::error::{ServiceError, ServiceResult};

/// Trait for read operations
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Get asset by ID
    async fn get_asset(&self, asset_id: AssetId) -> ServiceResult<Asset>;

    /// List assets in insertion order
    async fn list_assets(&self, params: ListParams) -> ServiceResult<Vec<Asset>>;

    /// List evidence across all assets in insertion order
    async fn list_evidence(&self, params: ListParams) -> ServiceResult<Vec<Evidence>>;

    /// Full history of one asset, oldest first
    async fn list_versions(&self, asset_id: AssetId) -> ServiceResult<Vec<AssetVersion>>;

    /// Row counts across the registry
    async fn stats(&self) -> ServiceResult<RegistryStats>;

    /// Check that storage is reachable
    async fn health_check(&self) -> ServiceResult<()>;
}

/// Default implementation of SearchService
pub struct DefaultSearchService {
    repository: Arc<dyn RegistryRepository>,
}

impl DefaultSearchService {
    /// Create a new search service
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SearchService for DefaultSearchService {
    #[instrument(skip(self), fields(asset_id = %asset_id))]
    async fn get_asset(&self, asset_id: AssetId) -> ServiceResult<Asset> {
        self.repository
            .find_asset(asset_id)
            .await?
            .ok_or_else(|| ServiceError::asset_not_found(asset_id))
    }

    #[instrument(skip(self))]
    async fn list_assets(&self, params: ListParams) -> ServiceResult<Vec<Asset>> {
        let page = params.page()?;
        let assets = self.repository.list_assets(page).await?;

        debug!(count = assets.len(), "Listed assets");
        Ok(assets)
    }

    #[instrument(skip(self))]
    async fn list_evidence(&self, params: ListParams) -> ServiceResult<Vec<Evidence>> {
        let page = params.page()?;
        let evidence = self.repository.list_evidence(page).await?;

        debug!(count = evidence.len(), "Listed evidence");
        Ok(evidence)
    }

    #[instrument(skip(self), fields(asset_id = %asset_id))]
    async fn list_versions(&self, asset_id: AssetId) -> ServiceResult<Vec<AssetVersion>> {
        if self.repository.find_asset(asset_id).await?.is_none() {
            return Err(ServiceError::asset_not_found(asset_id));
        }

        Ok(self.repository.versions_for_asset(asset_id).await?)
    }

    async fn stats(&self) -> ServiceResult<RegistryStats> {
        Ok(self.repository.stats().await?)
    }

    async fn health_check(&self) -> ServiceResult<()> {
        Ok(self.repository.health_check().await?)
    }
}

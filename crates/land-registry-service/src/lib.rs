//! Service layer for the Land Registry
//!
//! This crate provides the service layer that sits between the API and database layers.
//! It validates input, enforces the registry's write rules, and assembles timelines.
//!
//! # Architecture
//!
//! - **RegistrationService**: asset creation with its genesis version, recorded changes, evidence logging
//! - **SearchService**: asset, evidence and history queries
//! - **TimelineService**: the merged newest-first view of an asset
//!
//! # Example
//!
//! ```rust,no_run
//! use land_registry_service::{CreateAssetRequest, ServiceRegistry};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     repository: Arc<dyn land_registry_db::RegistryRepository>,
//! # ) -> Result<(), land_registry_service::ServiceError> {
//! let services = ServiceRegistry::new(repository);
//!
//! let asset = services
//!     .registration()
//!     .create_asset(CreateAssetRequest {
//!         name: "Plot A".to_string(),
//!         owner: "Owner X".to_string(),
//!         location_lat: -17.8,
//!         location_lon: 31.0,
//!         size_hectares: 5.0,
//!     })
//!     .await?;
//!
//! let timeline = services.timeline().get_timeline(asset.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod dto;
pub mod error;
pub mod registration;
pub mod search;
pub mod timeline;

// Re-export main types for convenience
pub use dto::*;
pub use error::{ServiceError, ServiceResult};

// Re-export service traits and implementations
pub use registration::{DefaultRegistrationService, RegistrationService};
pub use search::{DefaultSearchService, SearchService};
pub use timeline::{DefaultTimelineService, TimelineService};

use land_registry_db::RegistryRepository;
use std::sync::Arc;

/// Service registry that holds all service instances
///
/// This provides a convenient way to manage all services together
/// and ensures consistent dependency injection.
#[derive(Clone)]
pub struct ServiceRegistry {
    /// Registration service
    pub registration: Arc<dyn RegistrationService>,
    /// Search service
    pub search: Arc<dyn SearchService>,
    /// Timeline service
    pub timeline: Arc<dyn TimelineService>,
}

impl ServiceRegistry {
    /// Create a new service registry with default implementations
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self {
            registration: Arc::new(DefaultRegistrationService::new(repository.clone())),
            search: Arc::new(DefaultSearchService::new(repository.clone())),
            timeline: Arc::new(DefaultTimelineService::new(repository)),
        }
    }

    /// Create a service registry with custom implementations
    ///
    /// This allows for dependency injection of custom service implementations
    /// for testing or specialized behavior.
    pub fn with_services(
        registration: Arc<dyn RegistrationService>,
        search: Arc<dyn SearchService>,
        timeline: Arc<dyn TimelineService>,
    ) -> Self {
        Self {
            registration,
            search,
            timeline,
        }
    }

    /// Get the registration service
    pub fn registration(&self) -> &Arc<dyn RegistrationService> {
        &self.registration
    }

    /// Get the search service
    pub fn search(&self) -> &Arc<dyn SearchService> {
        &self.search
    }

    /// Get the timeline service
    pub fn timeline(&self) -> &Arc<dyn TimelineService> {
        &self.timeline
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use async_trait::async_trait;
    use land_registry_core::{
        Asset, AssetId, AssetVersion, Evidence, NewAsset, NewEvidence, NewVersion, Page,
    };
    use land_registry_db::{DbResult, RegistryRepository, RegistryStats};
    use mockall::mock;

    mock! {
        pub Repo {}

        #[async_trait]
        impl RegistryRepository for Repo {
            async fn create_asset(
                &self,
                asset: &NewAsset,
                genesis: &NewVersion,
            ) -> DbResult<(Asset, AssetVersion)>;
            async fn record_change(
                &self,
                id: AssetId,
                version: &NewVersion,
            ) -> DbResult<(Asset, AssetVersion)>;
            async fn find_asset(&self, id: AssetId) -> DbResult<Option<Asset>>;
            async fn list_assets(&self, page: Page) -> DbResult<Vec<Asset>>;
            async fn insert_evidence(&self, evidence: &NewEvidence) -> DbResult<Evidence>;
            async fn list_evidence(&self, page: Page) -> DbResult<Vec<Evidence>>;
            async fn versions_for_asset(&self, id: AssetId) -> DbResult<Vec<AssetVersion>>;
            async fn evidence_for_asset(&self, id: AssetId) -> DbResult<Vec<Evidence>>;
            async fn stats(&self) -> DbResult<RegistryStats>;
            async fn health_check(&self) -> DbResult<()>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use land_registry_core::{TimelineEventKind, GENESIS_REASON};
    use land_registry_db::{create_pool, PoolConfig, SqliteRegistryRepository};

    async fn services() -> ServiceRegistry {
        let pool = create_pool(&PoolConfig::in_memory()).await.unwrap();
        ServiceRegistry::new(Arc::new(SqliteRegistryRepository::new(pool)))
    }

    fn plot_a() -> CreateAssetRequest {
        CreateAssetRequest {
            name: "Plot A".to_string(),
            owner: "Owner X".to_string(),
            location_lat: -17.8,
            location_lon: 31.0,
            size_hectares: 5.0,
        }
    }

    #[tokio::test]
    async fn test_register_log_and_timeline() {
        let services = services().await;

        let asset = services.registration().create_asset(plot_a()).await.unwrap();
        assert_eq!(asset.id.get(), 1);

        let evidence = services
            .registration()
            .log_evidence(LogEvidenceRequest {
                asset_id: asset.id,
                evidence_type: "Photo".to_string(),
                description: "fence built".to_string(),
                gps_lat: -17.8,
                gps_lon: 31.0,
            })
            .await
            .unwrap();
        assert_eq!(evidence.id.get(), 1);

        let timeline = services.timeline().get_timeline(asset.id).await.unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].kind(), TimelineEventKind::Evidence);
        assert_eq!(timeline[0].description, "Photo: fence built");
        assert_eq!(timeline[1].kind(), TimelineEventKind::Version);
        assert_eq!(timeline[1].description, GENESIS_REASON);
    }

    #[tokio::test]
    async fn test_invalid_asset_persists_nothing() {
        let services = services().await;

        let mut request = plot_a();
        request.location_lat = 91.0;
        assert!(services.registration().create_asset(request).await.is_err());

        let stats = services.search().stats().await.unwrap();
        assert_eq!(stats.assets, 0);
        assert_eq!(stats.versions, 0);
    }

    #[tokio::test]
    async fn test_evidence_for_missing_asset() {
        let services = services().await;

        let err = services
            .registration()
            .log_evidence(LogEvidenceRequest {
                asset_id: land_registry_core::AssetId::new(99999),
                evidence_type: "Photo".to_string(),
                description: "x".to_string(),
                gps_lat: 0.0,
                gps_lon: 0.0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(services.search().stats().await.unwrap().evidence, 0);
    }

    #[tokio::test]
    async fn test_record_change_then_versions() {
        let services = services().await;
        let asset = services.registration().create_asset(plot_a()).await.unwrap();

        let response = services
            .registration()
            .record_change(
                asset.id,
                RecordChangeRequest {
                    name: "Plot A".to_string(),
                    owner: "Owner Y".to_string(),
                    change_reason: "Transfer of title".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.asset.owner, "Owner Y");

        let current = services.search().get_asset(asset.id).await.unwrap();
        assert_eq!(current, response.asset);

        let versions = services.search().list_versions(asset.id).await.unwrap();
        let reasons: Vec<_> = versions.iter().map(|v| v.change_reason.as_str()).collect();
        assert_eq!(reasons, vec![GENESIS_REASON, "Transfer of title"]);
    }

    #[tokio::test]
    async fn test_get_asset_is_idempotent() {
        let services = services().await;
        let asset = services.registration().create_asset(plot_a()).await.unwrap();

        let first = services.search().get_asset(asset.id).await.unwrap();
        let second = services.search().get_asset(asset.id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, asset);
    }
}

//! Timeline service
//!
//! Loads an asset's history and evidence and hands both streams to the
//! pure merge in `land_registry_core::timeline`.

use async_trait::async_trait;
use land_registry_core::{merge_timeline, AssetId, TimelineEvent};
use land_registry_db::RegistryRepository;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{ServiceError, ServiceResult};

/// Trait for timeline queries
#[async_trait]
pub trait TimelineService: Send + Sync {
    /// Merged history and evidence of one asset, newest first
    async fn get_timeline(&self, asset_id: AssetId) -> ServiceResult<Vec<TimelineEvent>>;
}

/// Default implementation of TimelineService
pub struct DefaultTimelineService {
    repository: Arc<dyn RegistryRepository>,
}

impl DefaultTimelineService {
    /// Create a new timeline service
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TimelineService for DefaultTimelineService {
    #[instrument(skip(self), fields(asset_id = %asset_id))]
    async fn get_timeline(&self, asset_id: AssetId) -> ServiceResult<Vec<TimelineEvent>> {
        if self.repository.find_asset(asset_id).await?.is_none() {
            return Err(ServiceError::asset_not_found(asset_id));
        }

        let (versions, evidence) = tokio::try_join!(
            self.repository.versions_for_asset(asset_id),
            self.repository.evidence_for_asset(asset_id),
        )?;

        let timeline = merge_timeline(&versions, &evidence);

        debug!(
            versions = versions.len(),
            evidence = evidence.len(),
            "Built timeline"
        );
        Ok(timeline)
    }
}

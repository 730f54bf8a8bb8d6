//! Repository trait abstractions for registry persistence
//!
//! This module defines the RegistryRepository trait that abstracts database
//! operations, allowing the service layer to run against SQLite or a mock.

use async_trait::async_trait;
use land_registry_core::{
    Asset, AssetId, AssetVersion, Evidence, NewAsset, NewEvidence, NewVersion, Page,
};
use serde::Serialize;

use crate::error::DbResult;

/// Row counts across the registry tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Number of registered assets
    pub assets: i64,

    /// Number of history rows, genesis rows included
    pub versions: i64,

    /// Number of evidence records
    pub evidence: i64,
}

/// Repository trait for registry persistence operations
///
/// Every write method is one unit of work: it either commits all of its rows
/// or none of them. Implementations must be thread-safe (Send + Sync) for use
/// in async contexts.
#[async_trait]
pub trait RegistryRepository: Send + Sync {
    /// Insert an asset together with its first history row
    ///
    /// # Returns
    /// * `Ok((Asset, AssetVersion))` - The stored asset and its genesis version
    /// * `Err(DbError)` - If either insert fails; nothing is persisted
    async fn create_asset(
        &self,
        asset: &NewAsset,
        genesis: &NewVersion,
    ) -> DbResult<(Asset, AssetVersion)>;

    /// Update an asset's name and owner and append the matching history row
    ///
    /// # Returns
    /// * `Ok((Asset, AssetVersion))` - The updated asset and the appended version
    /// * `Err(DbError::NotFound)` - If the asset does not exist
    async fn record_change(
        &self,
        id: AssetId,
        version: &NewVersion,
    ) -> DbResult<(Asset, AssetVersion)>;

    /// Find an asset by its ID
    async fn find_asset(&self, id: AssetId) -> DbResult<Option<Asset>>;

    /// List assets in insertion order
    async fn list_assets(&self, page: Page) -> DbResult<Vec<Asset>>;

    /// Insert an evidence record for an existing asset
    ///
    /// # Returns
    /// * `Ok(Evidence)` - The stored record
    /// * `Err(DbError::NotFound)` - If the referenced asset does not exist
    async fn insert_evidence(&self, evidence: &NewEvidence) -> DbResult<Evidence>;

    /// List evidence across all assets in insertion order
    async fn list_evidence(&self, page: Page) -> DbResult<Vec<Evidence>>;

    /// All history rows of one asset, oldest first
    async fn versions_for_asset(&self, id: AssetId) -> DbResult<Vec<AssetVersion>>;

    /// All evidence of one asset, oldest first
    async fn evidence_for_asset(&self, id: AssetId) -> DbResult<Vec<Evidence>>;

    /// Count rows in every table
    async fn stats(&self) -> DbResult<RegistryStats>;

    /// Check database connectivity
    async fn health_check(&self) -> DbResult<()>;
}

//! Append-only asset history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::{AssetChange, NewAsset};
use crate::types::{AssetId, VersionId};

/// Change reason carried by the first history row of every asset
pub const GENESIS_REASON: &str = "Genesis Creation";

/// One immutable history row for an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetVersion {
    pub id: VersionId,

    /// Asset this row belongs to
    pub asset_id: AssetId,

    /// Name as of this version
    pub name: String,

    /// Owner as of this version
    pub owner: String,

    /// Why the version was recorded
    pub change_reason: String,

    /// Insertion time; non-decreasing per asset
    pub changed_at: DateTime<Utc>,
}

impl AssetVersion {
    /// Whether this is the genesis row
    pub fn is_genesis(&self) -> bool {
        self.change_reason == GENESIS_REASON
    }
}

/// History row waiting to be inserted alongside its asset mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    pub name: String,
    pub owner: String,
    pub change_reason: String,
}

impl NewVersion {
    /// Genesis row for a parcel being registered
    pub fn genesis(asset: &NewAsset) -> Self {
        Self {
            name: asset.name.clone(),
            owner: asset.owner.clone(),
            change_reason: GENESIS_REASON.to_string(),
        }
    }

    /// History row describing a recorded change
    pub fn from_change(change: &AssetChange) -> Self {
        Self {
            name: change.name.clone(),
            owner: change.owner.clone(),
            change_reason: change.change_reason.clone(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.change_reason == GENESIS_REASON
    }
}

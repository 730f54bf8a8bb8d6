//! Evidence records supporting claims about a parcel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::types::{AssetId, EvidenceId};
use crate::validation::{
    require_latitude, require_longitude, require_non_empty, require_text, MAX_EVIDENCE_TYPE_LEN,
};

/// A proof artifact description attached to an asset
///
/// Evidence is not authoritative and logging it does not change the
/// asset's recorded state, so no history row accompanies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub asset_id: AssetId,

    /// Free-text category such as "Photo", "Survey" or "Document"
    pub evidence_type: String,

    pub description: String,

    /// Where the evidence was captured
    pub gps_lat: f64,
    pub gps_lon: f64,

    /// Insertion time
    pub timestamp: DateTime<Utc>,
}

impl Evidence {
    /// One-line summary used on the timeline
    pub fn summary(&self) -> String {
        format!("{}: {}", self.evidence_type, self.description)
    }
}

/// Validated input for logging evidence
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvidence {
    pub asset_id: AssetId,
    pub evidence_type: String,
    pub description: String,
    pub gps_lat: f64,
    pub gps_lon: f64,
}

impl NewEvidence {
    /// Build and validate an evidence record
    pub fn new(
        asset_id: AssetId,
        evidence_type: impl Into<String>,
        description: impl Into<String>,
        gps_lat: f64,
        gps_lon: f64,
    ) -> Result<Self> {
        let evidence = Self {
            asset_id,
            evidence_type: evidence_type.into(),
            description: description.into(),
            gps_lat,
            gps_lon,
        };
        evidence.validate()?;
        Ok(evidence)
    }

    pub fn validate(&self) -> Result<()> {
        if self.asset_id.get() <= 0 {
            return Err(RegistryError::invalid(
                "asset_id",
                format!("must be greater than 0, got {}", self.asset_id),
            ));
        }
        require_text("evidence_type", &self.evidence_type, MAX_EVIDENCE_TYPE_LEN)?;
        require_non_empty("description", &self.description)?;
        require_latitude("gps_lat", self.gps_lat)?;
        require_longitude("gps_lon", self.gps_lon)?;
        Ok(())
    }
}

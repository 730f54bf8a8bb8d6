//! Asset timeline
//!
//! History rows and evidence records are stored independently, each stamped
//! by the server clock when inserted. The timeline merges both streams for
//! one asset into a single newest-first sequence.
//!
//! Timestamps from the two streams can collide. Ordering is made total by a
//! fixed secondary key:
//!
//! 1. `timestamp`, newest first
//! 2. on equal timestamps, evidence before versions
//! 3. within the same kind, higher record id (later insertion) first

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::evidence::Evidence;
use crate::types::{EvidenceId, VersionId};
use crate::version::AssetVersion;

/// Which stream an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    Version,
    Evidence,
}

impl TimelineEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineEventKind::Version => "version",
            TimelineEventKind::Evidence => "evidence",
        }
    }

    /// Rank among events sharing a timestamp; higher sorts first
    fn tie_rank(&self) -> u8 {
        match self {
            TimelineEventKind::Version => 0,
            TimelineEventKind::Evidence => 1,
        }
    }
}

impl fmt::Display for TimelineEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific payload of a timeline event
///
/// Serialized adjacently tagged, so an event renders as
/// `{"event_type": "version", "details": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "details", rename_all = "snake_case")]
pub enum TimelineDetails {
    /// A history row
    Version {
        name: String,
        owner: String,
        version_id: VersionId,
    },

    /// An evidence record
    Evidence {
        evidence_type: String,
        gps_lat: f64,
        gps_lon: f64,
        evidence_id: EvidenceId,
    },
}

impl TimelineDetails {
    pub fn kind(&self) -> TimelineEventKind {
        match self {
            TimelineDetails::Version { .. } => TimelineEventKind::Version,
            TimelineDetails::Evidence { .. } => TimelineEventKind::Evidence,
        }
    }

    /// Id of the underlying record within its own stream
    pub fn record_id(&self) -> i64 {
        match self {
            TimelineDetails::Version { version_id, .. } => version_id.get(),
            TimelineDetails::Evidence { evidence_id, .. } => evidence_id.get(),
        }
    }
}

/// One entry of an asset's merged timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// When the underlying record was inserted
    pub timestamp: DateTime<Utc>,

    /// Change reason for versions, "{type}: {description}" for evidence
    pub description: String,

    #[serde(flatten)]
    pub details: TimelineDetails,
}

impl TimelineEvent {
    pub fn kind(&self) -> TimelineEventKind {
        self.details.kind()
    }

    /// Newest-first ordering with the deterministic tie-break
    pub fn newest_first(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.kind().tie_rank().cmp(&a.kind().tie_rank()))
            .then_with(|| b.details.record_id().cmp(&a.details.record_id()))
    }
}

impl From<&AssetVersion> for TimelineEvent {
    fn from(version: &AssetVersion) -> Self {
        Self {
            timestamp: version.changed_at,
            description: version.change_reason.clone(),
            details: TimelineDetails::Version {
                name: version.name.clone(),
                owner: version.owner.clone(),
                version_id: version.id,
            },
        }
    }
}

impl From<&Evidence> for TimelineEvent {
    fn from(evidence: &Evidence) -> Self {
        Self {
            timestamp: evidence.timestamp,
            description: evidence.summary(),
            details: TimelineDetails::Evidence {
                evidence_type: evidence.evidence_type.clone(),
                gps_lat: evidence.gps_lat,
                gps_lon: evidence.gps_lon,
                evidence_id: evidence.id,
            },
        }
    }
}

/// Merge one asset's history and evidence into a newest-first timeline
///
/// Pure: the inputs are only read. Callers are responsible for passing rows
/// belonging to a single asset.
pub fn merge_timeline(versions: &[AssetVersion], evidence: &[Evidence]) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = versions
        .iter()
        .map(TimelineEvent::from)
        .chain(evidence.iter().map(TimelineEvent::from))
        .collect();

    events.sort_by(TimelineEvent::newest_first);
    events
}

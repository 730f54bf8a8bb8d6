//! Core domain models and types for the Land Registry
//!
//! This crate contains the data structures and pure domain logic of the
//! registry: land parcels (assets), their append-only version history,
//! supporting evidence records, and the timeline merge that combines history
//! and evidence into one chronological view.
//!
//! Nothing in this crate performs I/O. Persistence lives in
//! `land-registry-db`, orchestration in `land-registry-service`.

pub mod asset;
pub mod error;
pub mod evidence;
pub mod timeline;
pub mod types;
pub mod validation;
pub mod version;

// Re-exports for convenience
pub use asset::{Asset, AssetChange, NewAsset};
pub use error::{RegistryError, Result};
pub use evidence::{Evidence, NewEvidence};
pub use timeline::{merge_timeline, TimelineDetails, TimelineEvent, TimelineEventKind};
pub use types::{AssetId, EvidenceId, Page, VersionId, DEFAULT_PAGE_LIMIT};
pub use version::{AssetVersion, NewVersion, GENESIS_REASON};

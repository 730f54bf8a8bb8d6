//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RegistryError, Result};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database row id
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying integer
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.parse::<i64>()
                    .map(Self)
                    .map_err(|e| format!("Invalid {}: {}", $label, e))
            }
        }
    };
}

record_id!(
    /// Identifier of a land parcel, assigned by storage on creation
    AssetId,
    "asset id"
);

record_id!(
    /// Identifier of a history row
    VersionId,
    "version id"
);

record_id!(
    /// Identifier of an evidence record
    EvidenceId,
    "evidence id"
);

/// Default page size for list operations
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Offset/limit window over an insertion-ordered listing
///
/// Only constructible through [`Page::new`], so a `Page` in hand is always
/// non-negative. Windows past the end of the data simply yield fewer rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Page {
    /// Create a page, rejecting negative values
    pub fn new(offset: i64, limit: i64) -> Result<Self> {
        if offset < 0 {
            return Err(RegistryError::invalid(
                "skip",
                format!("must be non-negative, got {}", offset),
            ));
        }
        if limit < 0 {
            return Err(RegistryError::invalid(
                "limit",
                format!("must be non-negative, got {}", limit),
            ));
        }
        Ok(Self { offset, limit })
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Maximum number of rows to return
    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&AssetId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_id_from_str() {
        assert_eq!("7".parse::<EvidenceId>().unwrap(), EvidenceId::new(7));
        assert!("seven".parse::<VersionId>().is_err());
    }

    #[test]
    fn test_page_rejects_negative_values() {
        assert!(Page::new(-1, 10).is_err());
        assert!(Page::new(0, -5).is_err());

        let page = Page::new(20, 0).unwrap();
        assert_eq!(page.offset(), 20);
        assert_eq!(page.limit(), 0);
    }

    #[test]
    fn test_page_default() {
        let page = Page::default();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), DEFAULT_PAGE_LIMIT);
    }
}

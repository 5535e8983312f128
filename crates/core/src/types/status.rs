//! Status enums for various entities.
//!
//! Field naming is deliberately uneven across entities (`status` on users,
//! `approvalStatus` on reports, bare `isActive` booleans elsewhere) because
//! the stored documents use those exact names; see DESIGN.md.

use serde::{Deserialize, Serialize};

/// Account standing of a platform user (`status` field on the user document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Banned,
}

impl UserStatus {
    /// The stored string form, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Banned => "banned",
        }
    }
}

/// Moderation state of a pet report (`approvalStatus` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// The stored string form, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Category of a pet report, one backing collection per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Lost,
    Found,
    Adoption,
    Breeding,
}

impl ReportKind {
    /// All report kinds, in the order the dashboard lists them.
    pub const ALL: [Self; 4] = [Self::Lost, Self::Found, Self::Adoption, Self::Breeding];

    /// The backing collection name for this kind.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Lost => "lost_pets",
            Self::Found => "found_pets",
            Self::Adoption => "adoption_pets",
            Self::Breeding => "breeding_pets",
        }
    }

    /// Resolve a kind from its backing collection name.
    #[must_use]
    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.collection() == collection)
    }

    /// Human-readable label for report listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lost => "Lost",
            Self::Found => "Found",
            Self::Adoption => "Adoption",
            Self::Breeding => "Breeding",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_serializes_lowercase() {
        let json = serde_json::to_string(&UserStatus::Banned).expect("serialize");
        assert_eq!(json, "\"banned\"");
    }

    #[test]
    fn test_report_kind_collections_roundtrip() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::from_collection(kind.collection()), Some(kind));
        }
        assert_eq!(ReportKind::from_collection("users"), None);
    }

    #[test]
    fn test_approval_status_default_is_pending() {
        assert_eq!(ApprovalStatus::default(), ApprovalStatus::Pending);
    }
}

//! Location document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alifi_core::LocationId;

/// A location document (collection `locations`, provider-assigned ID).
/// Locations are the targeting vocabulary for advertisements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Document ID; populated from the snapshot, not stored in the body.
    #[serde(skip)]
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form data for creating or editing a location.
#[derive(Debug, Clone, Default)]
pub struct NewLocation {
    pub name: String,
    pub description: String,
    pub display_order: i64,
}

impl NewLocation {
    /// Build a location record; new locations start active.
    #[must_use]
    pub fn into_record(self, now: DateTime<Utc>) -> LocationRecord {
        LocationRecord {
            id: LocationId::default(),
            name: self.name,
            description: self.description,
            display_order: self.display_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

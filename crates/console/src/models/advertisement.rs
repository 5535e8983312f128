//! Advertisement document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alifi_core::AdvertisementId;

/// An advertisement document (collection `advertisements`,
/// provider-assigned ID).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementRecord {
    /// Document ID; populated from the snapshot, not stored in the body.
    #[serde(skip)]
    pub id: AdvertisementId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    #[serde(default = "default_display_order")]
    pub display_order: u32,
    pub is_active: bool,
    #[serde(default)]
    pub click_url: String,
    /// Location names the ad targets; `["all"]` means everywhere.
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
    #[serde(default)]
    pub click_count: u64,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_display_order() -> u32 {
    1
}

fn default_locations() -> Vec<String> {
    vec!["all".to_owned()]
}

/// Form data for creating or editing an advertisement. The creative itself
/// is uploaded separately through the blob gateway.
#[derive(Debug, Clone, Default)]
pub struct NewAdvertisement {
    pub title: String,
    pub description: String,
    pub display_order: u32,
    pub click_url: String,
    pub locations: Vec<String>,
}

impl NewAdvertisement {
    /// Build an advertisement record around an uploaded creative URL.
    #[must_use]
    pub fn into_record(self, image_url: String, now: DateTime<Utc>) -> AdvertisementRecord {
        AdvertisementRecord {
            id: AdvertisementId::default(),
            title: self.title,
            description: self.description,
            image_url,
            display_order: self.display_order.max(1),
            is_active: true,
            click_url: self.click_url,
            locations: if self.locations.is_empty() {
                default_locations()
            } else {
                self.locations
            },
            click_count: 0,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

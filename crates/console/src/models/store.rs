//! Pet store document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alifi_core::StoreId;

/// A pet store document (collection `petStores`, provider-assigned ID).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    /// Document ID; populated from the snapshot, not stored in the body.
    #[serde(skip)]
    pub id: StoreId,
    pub name: String,
    pub category: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub working_hours: String,
    #[serde(default)]
    pub delivery_available: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub rating: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form data for creating or editing a pet store.
#[derive(Debug, Clone, Default)]
pub struct NewStore {
    pub name: String,
    pub category: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub website: String,
    pub working_hours: String,
    pub delivery_available: bool,
    pub description: String,
    pub image_url: String,
    pub rating: f64,
}

impl NewStore {
    /// Build a store record; new stores start active.
    #[must_use]
    pub fn into_record(self, now: DateTime<Utc>) -> StoreRecord {
        StoreRecord {
            id: StoreId::default(),
            name: self.name,
            category: self.category,
            phone: self.phone,
            email: self.email,
            address: self.address,
            city: self.city,
            website: self.website,
            working_hours: self.working_hours,
            delivery_available: self.delivery_available,
            description: self.description,
            image_url: self.image_url,
            // Unrated stores surface with the platform's baseline rating.
            rating: if self.rating > 0.0 { self.rating } else { 4.0 },
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_starts_active_with_baseline_rating() {
        let record = NewStore {
            name: "Paws".to_owned(),
            category: "supplies".to_owned(),
            city: "Algiers".to_owned(),
            ..NewStore::default()
        }
        .into_record(Utc::now());
        assert!(record.is_active);
        assert!((record.rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_store_field_names() {
        let record = NewStore::default().into_record(Utc::now());
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("workingHours").is_some());
        assert!(value.get("deliveryAvailable").is_some());
        assert!(value.get("id").is_none());
    }
}

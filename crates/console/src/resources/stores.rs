//! Pet store management: listing, create, edit, activation, hard delete.

use chrono::Utc;
use serde_json::json;

use alifi_core::StoreId;

use crate::error::ConsoleError;
use crate::gateway::DocumentGateway;
use crate::models::{NewStore, StoreRecord};

use super::{DeleteBehavior, Resource, ResourceManager, RowSummary};

impl Resource for StoreRecord {
    const COLLECTION: &'static str = "petStores";
    const DELETE: DeleteBehavior = DeleteBehavior::Hard;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn set_id(&mut self, id: &str) {
        self.id = StoreId::new(id);
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.category, self.city)
    }

    fn status_label(&self) -> &'static str {
        if self.is_active { "active" } else { "inactive" }
    }

    fn summary(&self) -> RowSummary {
        RowSummary {
            id: self.id.to_string(),
            title: self.name.clone(),
            subtitle: format!("{}, {}", self.category, self.city),
            badge: self.status_label(),
        }
    }
}

/// Manager over the `petStores` collection.
pub type StoreManager<D> = ResourceManager<StoreRecord, D>;

impl<D> ResourceManager<StoreRecord, D>
where
    D: DocumentGateway,
{
    /// Create a store with a provider-assigned ID; returns the ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn create(&mut self, form: NewStore) -> Result<StoreId, ConsoleError> {
        let record = form.into_record(Utc::now());
        let doc = serde_json::to_value(&record)
            .map_err(|e| ConsoleError::Validation(format!("unencodable store: {e}")))?;
        let id = self.gateway().create(StoreRecord::COLLECTION, doc).await?;
        self.load().await?;
        Ok(StoreId::new(id))
    }

    /// Overwrite a store's editable fields, keeping its creation time and
    /// active flag.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::NotFound`] if the store does not exist in the
    /// loaded set, [`ConsoleError::Provider`] if the write fails.
    pub async fn update_store(&mut self, id: &str, form: NewStore) -> Result<(), ConsoleError> {
        if self.get(id).is_none() {
            return Err(ConsoleError::NotFound(format!("store {id}")));
        }
        let mut doc = json!({
            "name": form.name,
            "category": form.category,
            "phone": form.phone,
            "email": form.email,
            "address": form.address,
            "city": form.city,
            "website": form.website,
            "workingHours": form.working_hours,
            "deliveryAvailable": form.delivery_available,
            "description": form.description,
            "imageUrl": form.image_url,
            "updatedAt": Utc::now(),
        });
        // A zeroed rating on edit means "leave the rating alone".
        if form.rating > 0.0 {
            if let Some(map) = doc.as_object_mut() {
                map.insert("rating".to_owned(), json!(form.rating));
            }
        }
        self.gateway()
            .update(StoreRecord::COLLECTION, id, doc)
            .await?;
        self.load().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::gateway::memory::MemoryGateway;

    use super::*;

    fn form(name: &str, city: &str) -> NewStore {
        NewStore {
            name: name.to_owned(),
            category: "supplies".to_owned(),
            phone: "021".to_owned(),
            city: city.to_owned(),
            address: "1 Rue".to_owned(),
            ..NewStore::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let mut manager = StoreManager::new(MemoryGateway::new());
        manager.load().await.unwrap();
        let id = manager.create(form("Paws", "Algiers")).await.unwrap();
        assert_eq!(manager.items().len(), 1);
        assert_eq!(manager.get(id.as_str()).unwrap().name, "Paws");
    }

    #[tokio::test]
    async fn test_update_keeps_rating_when_zero() {
        let mut manager = StoreManager::new(MemoryGateway::new());
        manager.load().await.unwrap();
        let id = manager.create(form("Paws", "Algiers")).await.unwrap();

        let mut edited = form("Paws & Claws", "Oran");
        edited.rating = 0.0;
        manager.update_store(id.as_str(), edited).await.unwrap();

        let store = manager.get(id.as_str()).unwrap();
        assert_eq!(store.name, "Paws & Claws");
        assert_eq!(store.city, "Oran");
        // Baseline rating assigned at creation survives the edit.
        assert!((store.rating - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_update_unknown_store_is_not_found() {
        let mut manager = StoreManager::new(MemoryGateway::new());
        manager.load().await.unwrap();
        let err = manager
            .update_store("ghost", form("X", "Y"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_hard_delete_removes_document() {
        let gw = MemoryGateway::new();
        let mut manager = StoreManager::new(gw.clone());
        manager.load().await.unwrap();
        let id = manager.create(form("Paws", "Algiers")).await.unwrap();

        manager.delete(id.as_str()).await.unwrap();
        assert!(manager.items().is_empty());
        assert_eq!(gw.document_count("petStores"), 0);
    }
}

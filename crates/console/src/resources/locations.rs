//! Service location management.

use chrono::Utc;

use alifi_core::LocationId;

use crate::error::ConsoleError;
use crate::gateway::{DocumentGateway, ListQuery};
use crate::models::{LocationRecord, NewLocation};

use super::{DeleteBehavior, Resource, ResourceManager, RowSummary};

impl Resource for LocationRecord {
    const COLLECTION: &'static str = "locations";
    const DELETE: DeleteBehavior = DeleteBehavior::Hard;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn set_id(&mut self, id: &str) {
        self.id = LocationId::new(id);
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }

    fn status_label(&self) -> &'static str {
        if self.is_active { "active" } else { "inactive" }
    }

    fn summary(&self) -> RowSummary {
        RowSummary {
            id: self.id.to_string(),
            title: self.name.clone(),
            subtitle: self.description.clone(),
            badge: self.status_label(),
        }
    }

    // Locations are positioned explicitly, with name as the tie-breaker.
    fn list_query() -> ListQuery {
        ListQuery::all().order_asc("displayOrder").order_asc("name")
    }
}

/// Manager over the `locations` collection.
pub type LocationManager<D> = ResourceManager<LocationRecord, D>;

impl<D> ResourceManager<LocationRecord, D>
where
    D: DocumentGateway,
{
    /// Create a location with a provider-assigned ID; returns the ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Validation`] for a blank name,
    /// [`ConsoleError::Provider`] if the write fails.
    pub async fn create(&mut self, form: NewLocation) -> Result<LocationId, ConsoleError> {
        if form.name.trim().is_empty() {
            return Err(ConsoleError::Validation("name is required".to_owned()));
        }
        let record = form.into_record(Utc::now());
        let doc = serde_json::to_value(&record)
            .map_err(|e| ConsoleError::Validation(format!("unencodable location: {e}")))?;
        let id = self
            .gateway()
            .create(LocationRecord::COLLECTION, doc)
            .await?;
        self.load().await?;
        Ok(LocationId::new(id))
    }

    /// Edit a location's name, description, and position.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Validation`] for a blank name,
    /// [`ConsoleError::Provider`] if the write fails.
    pub async fn update_location(&mut self, id: &str, form: NewLocation) -> Result<(), ConsoleError> {
        if form.name.trim().is_empty() {
            return Err(ConsoleError::Validation("name is required".to_owned()));
        }
        self.gateway()
            .update(
                LocationRecord::COLLECTION,
                id,
                serde_json::json!({
                    "name": form.name,
                    "description": form.description,
                    "displayOrder": form.display_order,
                    "updatedAt": Utc::now(),
                }),
            )
            .await?;
        self.load().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::gateway::memory::MemoryGateway;

    use super::*;

    fn form(name: &str, order: i64) -> NewLocation {
        NewLocation {
            name: name.to_owned(),
            description: String::new(),
            display_order: order,
        }
    }

    #[tokio::test]
    async fn test_listing_orders_by_position_then_name() {
        let mut manager = LocationManager::new(MemoryGateway::new());
        manager.load().await.unwrap();
        manager.create(form("Oran", 2)).await.unwrap();
        manager.create(form("Algiers", 1)).await.unwrap();
        manager.create(form("Annaba", 2)).await.unwrap();

        manager.load().await.unwrap();
        let names: Vec<&str> = manager.items().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Algiers", "Annaba", "Oran"]);
    }

    #[tokio::test]
    async fn test_update_moves_position() {
        let mut manager = LocationManager::new(MemoryGateway::new());
        manager.load().await.unwrap();
        let id = manager.create(form("Oran", 2)).await.unwrap();
        manager
            .update_location(id.as_str(), form("Oran Centre", 1))
            .await
            .unwrap();

        let location = manager.get(id.as_str()).unwrap();
        assert_eq!(location.name, "Oran Centre");
        assert_eq!(location.display_order, 1);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let mut manager = LocationManager::new(MemoryGateway::new());
        let err = manager.create(form("  ", 1)).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
    }
}

//! Entity management.
//!
//! Every managed collection follows the same shape: load the collection into
//! memory, filter and search in memory, write mutations through the gateway
//! and reload. [`ResourceManager`] carries that shared shape; the entity
//! modules add the operations specific to each collection.

pub mod admins;
pub mod ads;
pub mod locations;
pub mod reports;
pub mod settings;
pub mod stores;
pub mod users;
pub mod veterinarians;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use crate::error::ConsoleError;
use crate::gateway::{DocumentGateway, ListQuery};

/// How an entity leaves its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBehavior {
    /// Mark `isDeleted` and keep the document; listings hide it.
    Soft,
    /// Remove the document outright.
    Hard,
}

/// One row in a listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSummary {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub badge: &'static str,
}

/// A document type managed through [`ResourceManager`].
pub trait Resource: DeserializeOwned {
    /// Collection the documents live in.
    const COLLECTION: &'static str;
    /// Delete semantics for this collection.
    const DELETE: DeleteBehavior;

    /// The document ID, as recorded by [`set_id`](Self::set_id).
    fn id(&self) -> &str;

    /// Record the snapshot's document ID; IDs are not stored in bodies.
    fn set_id(&mut self, id: &str);

    /// Text the search box matches against, lowercased by the caller.
    fn search_text(&self) -> String;

    /// Label shown as the row's status badge and matched by status filters.
    fn status_label(&self) -> &'static str;

    /// Soft-deleted documents are dropped at load time.
    fn is_deleted(&self) -> bool {
        false
    }

    /// The row presented in listings.
    fn summary(&self) -> RowSummary;

    /// Query used to load the collection. Newest first by default.
    fn list_query() -> ListQuery {
        ListQuery::all().order_desc("createdAt")
    }
}

/// In-memory view of one collection plus its write path.
pub struct ResourceManager<R, D> {
    gateway: D,
    items: Vec<R>,
}

impl<R, D> ResourceManager<R, D>
where
    R: Resource,
    D: DocumentGateway,
{
    pub fn new(gateway: D) -> Self {
        Self {
            gateway,
            items: Vec::new(),
        }
    }

    pub(crate) fn gateway(&self) -> &D {
        &self.gateway
    }

    /// Reload the collection, replacing the in-memory set. Soft-deleted
    /// documents are dropped here.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the listing fails or
    /// [`ConsoleError::Validation`] if a document does not deserialize.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        let snapshots = self.gateway.list(R::COLLECTION, R::list_query()).await?;
        let mut items = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let mut item: R = serde_json::from_value(snapshot.data).map_err(|e| {
                ConsoleError::Validation(format!(
                    "malformed {}/{} document: {e}",
                    R::COLLECTION,
                    snapshot.id
                ))
            })?;
            item.set_id(&snapshot.id);
            if !item.is_deleted() {
                items.push(item);
            }
        }
        debug!(count = items.len(), "collection loaded");
        self.items = items;
        Ok(())
    }

    /// The loaded items, in listing order.
    #[must_use]
    pub fn items(&self) -> &[R] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Filter the loaded items in memory. `search` is a case-insensitive
    /// substring match; an empty string matches everything. `status`
    /// restricts to items whose status label equals it exactly.
    #[must_use]
    pub fn filter(&self, search: &str, status: Option<&str>) -> Vec<&R> {
        let needle = search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                needle.is_empty() || item.search_text().to_lowercase().contains(&needle)
            })
            .filter(|item| status.is_none_or(|s| item.status_label() == s))
            .collect()
    }

    /// Listing rows for the current filter.
    #[must_use]
    pub fn rows(&self, search: &str, status: Option<&str>) -> Vec<RowSummary> {
        self.filter(search, status)
            .into_iter()
            .map(Resource::summary)
            .collect()
    }

    /// Flip the entity's `isActive` flag and reload.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails; the in-memory
    /// set is left as it was.
    pub async fn set_active(&mut self, id: &str, active: bool) -> Result<(), ConsoleError> {
        self.gateway
            .update(
                R::COLLECTION,
                id,
                json!({"isActive": active, "updatedAt": Utc::now()}),
            )
            .await?;
        self.load().await
    }

    /// Delete an entity per the collection's semantics and reload.
    /// Soft deletes are idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn delete(&mut self, id: &str) -> Result<(), ConsoleError> {
        match R::DELETE {
            DeleteBehavior::Soft => {
                self.gateway
                    .update(
                        R::COLLECTION,
                        id,
                        json!({"isDeleted": true, "updatedAt": Utc::now()}),
                    )
                    .await?;
            }
            DeleteBehavior::Hard => {
                self.gateway.delete(R::COLLECTION, id).await?;
            }
        }
        self.load().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::gateway::memory::MemoryGateway;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Toy {
        #[serde(skip)]
        id: String,
        name: String,
        #[serde(default)]
        is_deleted: bool,
        #[serde(default = "truthy")]
        is_active: bool,
    }

    const fn truthy() -> bool {
        true
    }

    impl Resource for Toy {
        const COLLECTION: &'static str = "toys";
        const DELETE: DeleteBehavior = DeleteBehavior::Soft;

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: &str) {
            self.id = id.to_owned();
        }

        fn search_text(&self) -> String {
            self.name.clone()
        }

        fn status_label(&self) -> &'static str {
            if self.is_active { "active" } else { "inactive" }
        }

        fn is_deleted(&self) -> bool {
            self.is_deleted
        }

        fn summary(&self) -> RowSummary {
            RowSummary {
                id: self.id.clone(),
                title: self.name.clone(),
                subtitle: String::new(),
                badge: self.status_label(),
            }
        }
    }

    async fn seeded_manager() -> ResourceManager<Toy, MemoryGateway> {
        let gw = MemoryGateway::new();
        gw.seed_document("toys", "t1", json!({"name": "Ball", "createdAt": "2026-01-02T00:00:00Z"}));
        gw.seed_document("toys", "t2", json!({"name": "Rope", "createdAt": "2026-01-03T00:00:00Z"}));
        gw.seed_document(
            "toys",
            "t3",
            json!({"name": "Bone", "isDeleted": true, "createdAt": "2026-01-01T00:00:00Z"}),
        );
        let mut manager = ResourceManager::new(gw);
        manager.load().await.unwrap();
        manager
    }

    #[tokio::test]
    async fn test_load_hides_soft_deleted_and_orders_newest_first() {
        let manager = seeded_manager().await;
        let names: Vec<&str> = manager.items().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Rope", "Ball"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let manager = seeded_manager().await;
        assert_eq!(manager.filter("ALL", None).len(), 1);
        assert_eq!(manager.filter("", None).len(), 2);
        assert_eq!(manager.filter("xyz", None).len(), 0);
    }

    #[tokio::test]
    async fn test_status_filter_matches_label() {
        let manager = seeded_manager().await;
        assert_eq!(manager.filter("", Some("active")).len(), 2);
        assert_eq!(manager.filter("", Some("inactive")).len(), 0);
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent() {
        let mut manager = seeded_manager().await;
        manager.delete("t1").await.unwrap();
        assert!(manager.get("t1").is_none());
        // A second delete of the same row is a no-op, not an error.
        manager.delete("t1").await.unwrap();
        assert_eq!(manager.items().len(), 1);
    }

    #[tokio::test]
    async fn test_set_active_updates_badge() {
        let mut manager = seeded_manager().await;
        manager.set_active("t1", false).await.unwrap();
        assert_eq!(manager.get("t1").unwrap().status_label(), "inactive");
    }
}

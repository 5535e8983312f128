//! Pet report moderation across the four report collections.
//!
//! Reports live in one collection per kind (`lost_pets`, `found_pets`,
//! `adoption_pets`, `breeding_pets`) with a shared moderation shape. The
//! manager loads all four into one list; moderation writes go back to the
//! kind's own collection.

use chrono::Utc;
use serde_json::json;
use tracing::warn;

use alifi_core::{ApprovalStatus, ReportKind};

use crate::error::ConsoleError;
use crate::gateway::{DocumentGateway, ListQuery};
use crate::models::ReportRecord;

/// Per-collection load cap; the dashboard only moderates recent reports.
const LOAD_LIMIT: usize = 50;

/// Merged view of the four report collections.
pub struct ReportManager<D> {
    gateway: D,
    items: Vec<ReportRecord>,
}

impl<D> ReportManager<D>
where
    D: DocumentGateway,
{
    pub fn new(gateway: D) -> Self {
        Self {
            gateway,
            items: Vec::new(),
        }
    }

    /// Reload all four collections, newest first. A collection that fails
    /// to list is skipped with a warning so one bad collection does not
    /// blank the whole view.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Validation`] if a document does not
    /// deserialize.
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        let mut items = Vec::new();
        for kind in ReportKind::ALL {
            let query = ListQuery::all().order_desc("createdAt").limit(LOAD_LIMIT);
            let snapshots = match self.gateway.list(kind.collection(), query).await {
                Ok(snapshots) => snapshots,
                Err(err) => {
                    warn!(collection = kind.collection(), error = %err, "report listing failed");
                    continue;
                }
            };
            for snapshot in snapshots {
                let mut report: ReportRecord =
                    serde_json::from_value(snapshot.data).map_err(|e| {
                        ConsoleError::Validation(format!(
                            "malformed {}/{} document: {e}",
                            kind.collection(),
                            snapshot.id
                        ))
                    })?;
                report.id = alifi_core::ReportId::new(snapshot.id);
                report.kind = Some(kind);
                items.push(report);
            }
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.items = items;
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> &[ReportRecord] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ReportRecord> {
        self.items.iter().find(|r| r.id.as_str() == id)
    }

    /// In-memory filter by kind, moderation state, and search text.
    #[must_use]
    pub fn filter(
        &self,
        search: &str,
        kind: Option<ReportKind>,
        status: Option<ApprovalStatus>,
    ) -> Vec<&ReportRecord> {
        let needle = search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|r| kind.is_none_or(|k| r.kind == Some(k)))
            .filter(|r| status.is_none_or(|s| r.approval_status == s))
            .filter(|r| {
                needle.is_empty() || {
                    let haystack = format!(
                        "{} {}",
                        r.title(),
                        r.description.as_deref().unwrap_or_default()
                    );
                    haystack.to_lowercase().contains(&needle)
                }
            })
            .collect()
    }

    /// Approve a report, stamping the decision.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn approve(&mut self, kind: ReportKind, id: &str) -> Result<(), ConsoleError> {
        let now = Utc::now();
        self.gateway
            .update(
                kind.collection(),
                id,
                json!({
                    "approvalStatus": ApprovalStatus::Approved,
                    "approvedAt": now,
                    "updatedAt": now,
                }),
            )
            .await?;
        self.load().await
    }

    /// Reject a report, stamping the decision.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn reject(&mut self, kind: ReportKind, id: &str) -> Result<(), ConsoleError> {
        let now = Utc::now();
        self.gateway
            .update(
                kind.collection(),
                id,
                json!({
                    "approvalStatus": ApprovalStatus::Rejected,
                    "rejectedAt": now,
                    "updatedAt": now,
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

    fn seeded_gateway() -> MemoryGateway {
        let gw = MemoryGateway::new();
        gw.seed_document(
            "lost_pets",
            "r1",
            json!({"petName": "Milo", "description": "Grey tabby",
                   "createdAt": "2026-04-03T00:00:00Z"}),
        );
        gw.seed_document(
            "found_pets",
            "r2",
            json!({"petName": "Rex", "approvalStatus": "approved",
                   "createdAt": "2026-04-05T00:00:00Z"}),
        );
        gw.seed_document(
            "adoption_pets",
            "r3",
            json!({"petName": "Luna", "createdAt": "2026-04-01T00:00:00Z"}),
        );
        gw
    }

    #[tokio::test]
    async fn test_load_merges_collections_newest_first() {
        let mut manager = ReportManager::new(seeded_gateway());
        manager.load().await.unwrap();
        let names: Vec<&str> = manager.items().iter().map(ReportRecord::title).collect();
        assert_eq!(names, ["Rex", "Milo", "Luna"]);
        assert_eq!(manager.get("r1").unwrap().kind, Some(ReportKind::Lost));
    }

    #[tokio::test]
    async fn test_missing_approval_status_counts_as_pending() {
        let mut manager = ReportManager::new(seeded_gateway());
        manager.load().await.unwrap();
        let pending = manager.filter("", None, Some(ApprovalStatus::Pending));
        assert_eq!(pending.len(), 2);
    }

    #[tokio::test]
    async fn test_approve_stamps_decision() {
        let gw = seeded_gateway();
        let mut manager = ReportManager::new(gw.clone());
        manager.load().await.unwrap();

        manager.approve(ReportKind::Lost, "r1").await.unwrap();
        assert_eq!(
            manager.get("r1").unwrap().approval_status,
            ApprovalStatus::Approved
        );
        let doc = gw.get("lost_pets", "r1").await.unwrap().unwrap();
        assert!(doc.get("approvedAt").is_some());
    }

    #[tokio::test]
    async fn test_reject_then_filter_by_kind() {
        let mut manager = ReportManager::new(seeded_gateway());
        manager.load().await.unwrap();

        manager.reject(ReportKind::Adoption, "r3").await.unwrap();
        let rejected = manager.filter("", Some(ReportKind::Adoption), None);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].approval_status, ApprovalStatus::Rejected);
    }

    #[tokio::test]
    async fn test_inaccessible_collection_is_skipped() {
        let gw = seeded_gateway();
        let mut manager = ReportManager::new(gw);
        manager.load().await.unwrap();
        // Nothing seeded under breeding_pets; the other three still load.
        assert_eq!(manager.items().len(), 3);
    }

    #[tokio::test]
    async fn test_search_matches_pet_name() {
        let mut manager = ReportManager::new(seeded_gateway());
        manager.load().await.unwrap();
        assert_eq!(manager.filter("tabby", None, None).len(), 1);
        assert_eq!(manager.filter("milo", None, None).len(), 1);
    }
}

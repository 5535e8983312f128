//! Dashboard statistics and the recent-activity feed.
//!
//! Counters read the raw documents rather than the typed models so a single
//! malformed legacy document cannot blank the dashboard. Reports whose
//! moderation field is absent count as pending; that is what an unmoderated
//! legacy report is.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use alifi_core::ReportKind;

use crate::error::ConsoleError;
use crate::gateway::{DocumentGateway, ListQuery};

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub total_veterinarians: usize,
    pub total_stores: usize,
    pub active_stores: usize,
    pub total_reports: usize,
    pub pending_reports: usize,
}

/// One line in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub title: String,
    pub description: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// How many newest rows each feeder collection contributes.
const FEED_PER_SOURCE: usize = 3;
/// Feed length after merging.
const FEED_LIMIT: usize = 5;

/// Read-only aggregation over the managed collections.
pub struct StatsService<D> {
    gateway: D,
}

impl<D> StatsService<D>
where
    D: DocumentGateway,
{
    pub fn new(gateway: D) -> Self {
        Self { gateway }
    }

    /// Compute the headline counters. A report collection that fails to
    /// list is skipped with a warning; the other counters still come back.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if one of the primary collections
    /// (users, veterinarians, stores) fails to list.
    pub async fn gather(&self) -> Result<DashboardStats, ConsoleError> {
        let mut stats = DashboardStats::default();

        for user in self.gateway.list("users", ListQuery::all()).await? {
            if flag(&user.data, "isDeleted") {
                continue;
            }
            stats.total_users += 1;
            if user.data.get("status").and_then(Value::as_str) != Some("banned") {
                stats.active_users += 1;
            }
        }

        for vet in self.gateway.list("veterinarians", ListQuery::all()).await? {
            if !flag(&vet.data, "isDeleted") {
                stats.total_veterinarians += 1;
            }
        }

        for store in self.gateway.list("petStores", ListQuery::all()).await? {
            stats.total_stores += 1;
            if flag(&store.data, "isActive") {
                stats.active_stores += 1;
            }
        }

        for kind in ReportKind::ALL {
            let snapshots = match self.gateway.list(kind.collection(), ListQuery::all()).await {
                Ok(snapshots) => snapshots,
                Err(err) => {
                    warn!(collection = kind.collection(), error = %err, "report count skipped");
                    continue;
                }
            };
            for report in snapshots {
                stats.total_reports += 1;
                // Unmoderated legacy reports carry no approvalStatus, or the
                // older "active" value; both still need review.
                let status = report.data.get("approvalStatus").and_then(Value::as_str);
                if matches!(status, None | Some("pending" | "active")) {
                    stats.pending_reports += 1;
                }
            }
        }

        Ok(stats)
    }

    /// The newest veterinarians and stores, merged newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if either listing fails.
    pub async fn recent_activity(&self) -> Result<Vec<ActivityEntry>, ConsoleError> {
        let newest = ListQuery::all()
            .order_desc("createdAt")
            .limit(FEED_PER_SOURCE);

        let mut entries = Vec::new();
        for vet in self.gateway.list("veterinarians", newest.clone()).await? {
            entries.push(ActivityEntry {
                title: text(&vet.data, "name"),
                description: format!(
                    "New veterinarian ({})",
                    text(&vet.data, "specialization")
                ),
                timestamp: created_at(&vet.data),
            });
        }
        for store in self.gateway.list("petStores", newest).await? {
            entries.push(ActivityEntry {
                title: text(&store.data, "name"),
                description: format!("New pet store in {}", text(&store.data, "city")),
                timestamp: created_at(&store.data),
            });
        }

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(FEED_LIMIT);
        Ok(entries)
    }
}

fn flag(data: &Value, field: &str) -> bool {
    data.get(field).and_then(Value::as_bool).unwrap_or(false)
}

fn text(data: &Value, field: &str) -> String {
    data.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn created_at(data: &Value) -> Option<DateTime<Utc>> {
    data.get("createdAt")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())
}

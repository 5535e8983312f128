//! Pet report document.
//!
//! Reports live in four parallel collections (one per [`ReportKind`]) and
//! are free-form documents submitted by mobile users; only the moderation
//! fields are typed here, the rest rides along in `extra`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use alifi_core::{ApprovalStatus, ReportId, ReportKind};

/// A pet report document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    /// Document ID from the snapshot. Some legacy documents carry a stale
    /// `id` field in the body; the snapshot ID always wins.
    #[serde(skip)]
    pub id: ReportId,
    /// Which collection the report came from; tagged at load time.
    #[serde(skip)]
    pub kind: Option<ReportKind>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub pet_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    /// Submitter-provided fields the console displays but never edits.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ReportRecord {
    /// Title for listings: pet name, else the report ID.
    #[must_use]
    pub fn title(&self) -> &str {
        self.pet_name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

//! Admin message and notification documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alifi_core::{MessageId, UserId};

/// Presentation tone of an admin message (`type` field on the document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Info,
    Warning,
    Alert,
}

/// An admin-to-user message (collection `admin_messages`). A copy lands in
/// the recipient's `users/{id}/notifications` subcollection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessage {
    /// Document ID; populated from the snapshot, not stored in the body.
    #[serde(skip)]
    pub id: MessageId,
    pub user_id: UserId,
    pub subject: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    pub is_read: bool,
    pub is_admin_message: bool,
    #[serde(default)]
    pub is_broadcast: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

/// The content an operator composes; addressing is supplied separately.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub subject: String,
    pub content: String,
    pub kind: MessageKind,
}

impl MessageDraft {
    /// Materialize the draft as a message document for one recipient.
    #[must_use]
    pub fn to_message(
        &self,
        user_id: UserId,
        broadcast: bool,
        now: DateTime<Utc>,
    ) -> AdminMessage {
        AdminMessage {
            id: MessageId::default(),
            user_id,
            subject: self.subject.clone(),
            content: self.content.clone(),
            kind: self.kind,
            is_read: false,
            is_admin_message: true,
            is_broadcast: broadcast,
            created_at: now,
            updated_at: now,
            read_at: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type_field() {
        let draft = MessageDraft {
            subject: "s".to_owned(),
            content: "c".to_owned(),
            kind: MessageKind::Alert,
        };
        let msg = draft.to_message(UserId::new("u1"), true, Utc::now());
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "alert");
        assert_eq!(value["isBroadcast"], true);
        assert_eq!(value["isRead"], false);
    }
}

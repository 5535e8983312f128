//! User management: listing, ban and unban, soft delete.

use chrono::Utc;
use serde_json::{Value, json};

use crate::error::ConsoleError;
use crate::gateway::DocumentGateway;
use crate::models::UserRecord;

use super::{DeleteBehavior, Resource, ResourceManager, RowSummary};

impl Resource for UserRecord {
    const COLLECTION: &'static str = "users";
    const DELETE: DeleteBehavior = DeleteBehavior::Soft;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn set_id(&mut self, id: &str) {
        self.id = alifi_core::UserId::new(id);
    }

    fn search_text(&self) -> String {
        let mut text = self.display_name().to_owned();
        if let Some(email) = &self.email {
            text.push(' ');
            text.push_str(email);
        }
        text
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn summary(&self) -> RowSummary {
        RowSummary {
            id: self.id.to_string(),
            title: self.display_name().to_owned(),
            subtitle: self.email.clone().unwrap_or_default(),
            badge: self.status_label(),
        }
    }
}

/// Manager over the `users` collection.
pub type UserManager<D> = ResourceManager<UserRecord, D>;

impl<D> ResourceManager<UserRecord, D>
where
    D: DocumentGateway,
{
    /// Ban a user, stamping when it happened.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn ban(&mut self, id: &str) -> Result<(), ConsoleError> {
        let now = Utc::now();
        self.gateway()
            .update(
                UserRecord::COLLECTION,
                id,
                json!({"status": "banned", "bannedAt": now, "updatedAt": now}),
            )
            .await?;
        self.load().await
    }

    /// Lift a ban, clearing the ban timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn unban(&mut self, id: &str) -> Result<(), ConsoleError> {
        self.gateway()
            .update(
                UserRecord::COLLECTION,
                id,
                json!({"status": "active", "bannedAt": Value::Null, "updatedAt": Utc::now()}),
            )
            .await?;
        self.load().await
    }
}

//! Veterinarian management: listing, profile edits, activation, soft delete.
//!
//! New veterinarians enter through [`crate::provisioning`]; this module
//! covers everything after that.

use chrono::Utc;
use serde_json::json;

use crate::error::ConsoleError;
use crate::gateway::DocumentGateway;
use crate::models::{VeterinarianRecord, VeterinarianUpdate};

use super::{DeleteBehavior, Resource, ResourceManager, RowSummary};

impl Resource for VeterinarianRecord {
    const COLLECTION: &'static str = "veterinarians";
    const DELETE: DeleteBehavior = DeleteBehavior::Soft;

    fn id(&self) -> &str {
        self.uid.as_str()
    }

    fn set_id(&mut self, id: &str) {
        // Profiles are keyed by the owning account; the body's uid wins if
        // present, but legacy documents may omit it.
        if self.uid.as_str().is_empty() {
            self.uid = alifi_core::AccountId::new(id);
        }
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.email, self.specialization)
    }

    fn status_label(&self) -> &'static str {
        if self.is_active { "active" } else { "inactive" }
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn summary(&self) -> RowSummary {
        RowSummary {
            id: self.uid.to_string(),
            title: self.name.clone(),
            subtitle: self.specialization.clone(),
            badge: self.status_label(),
        }
    }
}

/// Manager over the `veterinarians` collection.
pub type VeterinarianManager<D> = ResourceManager<VeterinarianRecord, D>;

impl<D> ResourceManager<VeterinarianRecord, D>
where
    D: DocumentGateway,
{
    /// Apply profile edits, leaving ratings and flags untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails or
    /// [`ConsoleError::Validation`] if the update does not encode.
    pub async fn update_details(
        &mut self,
        id: &str,
        update: VeterinarianUpdate,
    ) -> Result<(), ConsoleError> {
        let mut doc = serde_json::to_value(&update)
            .map_err(|e| ConsoleError::Validation(format!("unencodable update: {e}")))?;
        if let Some(map) = doc.as_object_mut() {
            map.insert("updatedAt".to_owned(), json!(Utc::now()));
        }
        self.gateway()
            .update(VeterinarianRecord::COLLECTION, id, doc)
            .await?;
        self.load().await
    }
}

//! Advertisement management: banner upload, rotation order, engagement
//! counters, hard delete.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use alifi_core::AdvertisementId;

use crate::error::ConsoleError;
use crate::gateway::{BlobGateway, DocumentGateway};
use crate::models::{AdvertisementRecord, NewAdvertisement};

use super::{DeleteBehavior, Resource, ResourceManager, RowSummary};

/// How many ads the mobile clients rotate through.
const ROTATION_SIZE: usize = 10;

impl Resource for AdvertisementRecord {
    const COLLECTION: &'static str = "advertisements";
    const DELETE: DeleteBehavior = DeleteBehavior::Hard;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn set_id(&mut self, id: &str) {
        self.id = AdvertisementId::new(id);
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    fn status_label(&self) -> &'static str {
        if self.is_active { "active" } else { "inactive" }
    }

    fn summary(&self) -> RowSummary {
        RowSummary {
            id: self.id.to_string(),
            title: self.title.clone(),
            subtitle: format!("order {}", self.display_order),
            badge: self.status_label(),
        }
    }
}

/// Manager over the `advertisements` collection.
pub type AdManager<D> = ResourceManager<AdvertisementRecord, D>;

impl<D> ResourceManager<AdvertisementRecord, D>
where
    D: DocumentGateway + BlobGateway,
{
    /// Upload the banner image and create the advertisement. `ceiling` is
    /// the configured maximum number of ads; creation past it is refused
    /// before anything is uploaded.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Validation`] at the ceiling,
    /// [`ConsoleError::Provider`] if the upload or write fails.
    pub async fn create(
        &mut self,
        form: NewAdvertisement,
        image: Vec<u8>,
        image_name: &str,
        ceiling: usize,
    ) -> Result<AdvertisementId, ConsoleError> {
        if self.items().len() >= ceiling {
            return Err(ConsoleError::Validation(format!(
                "advertisement limit of {ceiling} reached"
            )));
        }
        let path = format!("advertisements/{}_{image_name}", Uuid::new_v4());
        let image_url = self.gateway().upload(&path, image).await?;

        let record = form.into_record(image_url, Utc::now());
        let doc = serde_json::to_value(&record)
            .map_err(|e| ConsoleError::Validation(format!("unencodable advertisement: {e}")))?;
        let id = self
            .gateway()
            .create(AdvertisementRecord::COLLECTION, doc)
            .await?;
        self.load().await?;
        Ok(AdvertisementId::new(id))
    }

    /// The ads the clients rotate: active, by display order.
    #[must_use]
    pub fn rotation(&self) -> Vec<&AdvertisementRecord> {
        let mut active: Vec<&AdvertisementRecord> =
            self.items().iter().filter(|ad| ad.is_active).collect();
        active.sort_by_key(|ad| ad.display_order);
        active.truncate(ROTATION_SIZE);
        active
    }

    /// Count an impression.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::NotFound`] for an unknown ad,
    /// [`ConsoleError::Provider`] if the write fails.
    pub async fn record_view(&mut self, id: &str) -> Result<(), ConsoleError> {
        let views = self
            .get(id)
            .ok_or_else(|| ConsoleError::NotFound(format!("advertisement {id}")))?
            .views;
        self.gateway()
            .update(
                AdvertisementRecord::COLLECTION,
                id,
                json!({"views": views + 1}),
            )
            .await?;
        self.load().await
    }

    /// Count a click-through.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::NotFound`] for an unknown ad,
    /// [`ConsoleError::Provider`] if the write fails.
    pub async fn record_click(&mut self, id: &str) -> Result<(), ConsoleError> {
        let clicks = self
            .get(id)
            .ok_or_else(|| ConsoleError::NotFound(format!("advertisement {id}")))?
            .click_count;
        self.gateway()
            .update(
                AdvertisementRecord::COLLECTION,
                id,
                json!({"clickCount": clicks + 1}),
            )
            .await?;
        self.load().await
    }
}

//! Application settings store.

use chrono::Utc;

use crate::error::ConsoleError;
use crate::gateway::DocumentGateway;
use crate::models::AppSettings;

const COLLECTION: &str = "settings";
const DOC_ID: &str = "app";

/// Loads and saves the settings singleton at `settings/app`.
pub struct SettingsStore<D> {
    gateway: D,
}

impl<D> SettingsStore<D>
where
    D: DocumentGateway,
{
    pub fn new(gateway: D) -> Self {
        Self { gateway }
    }

    /// Load the settings document; a missing or partial document falls back
    /// to the platform defaults field by field.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the read fails.
    pub async fn load(&self) -> Result<AppSettings, ConsoleError> {
        match self.gateway.get(COLLECTION, DOC_ID).await? {
            Some(doc) => serde_json::from_value(doc).map_err(|e| {
                ConsoleError::Validation(format!("malformed settings document: {e}"))
            }),
            None => Ok(AppSettings::default()),
        }
    }

    /// Persist the settings, merging so fields written by other tools
    /// survive.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn save(&self, mut settings: AppSettings) -> Result<AppSettings, ConsoleError> {
        settings.updated_at = Some(Utc::now());
        let doc = serde_json::to_value(&settings)
            .map_err(|e| ConsoleError::Validation(format!("unencodable settings: {e}")))?;
        self.gateway.set(COLLECTION, DOC_ID, doc, true).await?;
        Ok(settings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use crate::gateway::memory::MemoryGateway;

    use super::*;

    #[tokio::test]
    async fn test_missing_document_yields_defaults() {
        let store = SettingsStore::new(MemoryGateway::new());
        let settings = store.load().await.unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = SettingsStore::new(MemoryGateway::new());
        let settings = AppSettings {
            maintenance_mode: true,
            report_expiry_days: 14,
            ..AppSettings::default()
        };

        let saved = store.save(settings).await.unwrap();
        assert!(saved.updated_at.is_some());

        let loaded = store.load().await.unwrap();
        assert!(loaded.maintenance_mode);
        assert_eq!(loaded.report_expiry_days, 14);
    }

    #[tokio::test]
    async fn test_save_merges_with_foreign_fields() {
        let gw = MemoryGateway::new();
        gw.seed_document("settings", "app", json!({"featureFlags": {"chat": true}}));
        let store = SettingsStore::new(gw.clone());

        store.save(AppSettings::default()).await.unwrap();
        let doc = gw.get("settings", "app").await.unwrap().unwrap();
        assert_eq!(doc["featureFlags"]["chat"], true);
        assert_eq!(doc["appName"], "Alifi - Pet Care Platform");
    }
}

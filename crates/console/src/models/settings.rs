//! Application settings singleton (document `settings/app`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform-wide settings, stored as a single document and merged on save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub app_name: String,
    pub app_description: String,
    pub maintenance_mode: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub admin_email: String,
    pub auto_approve_reports: bool,
    pub max_images_per_report: u32,
    pub report_expiry_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "Alifi - Pet Care Platform".to_owned(),
            app_description:
                "A comprehensive platform for pet care, adoption, and veterinary services."
                    .to_owned(),
            maintenance_mode: false,
            email_notifications: true,
            push_notifications: true,
            admin_email: "admin@alifi.com".to_owned(),
            auto_approve_reports: false,
            max_images_per_report: 5,
            report_expiry_days: 30,
            updated_at: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_fills_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"maintenanceMode":true}"#).unwrap();
        assert!(settings.maintenance_mode);
        assert_eq!(settings.max_images_per_report, 5);
        assert_eq!(settings.report_expiry_days, 30);
    }
}

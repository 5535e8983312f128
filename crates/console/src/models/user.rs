//! Platform user document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alifi_core::{AdminRole, UserId, UserStatus};

/// Admin authorization claims stored on a user document
/// (`customClaims` field).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomClaims {
    /// Whether this user may access the admin console at all.
    #[serde(default)]
    pub admin: bool,
    /// The admin's role; defaults to `admin` when the claim predates roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
}

/// A platform user document (collection `users`, keyed by account ID).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Document ID; populated from the snapshot, not stored in the body.
    #[serde(skip)]
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_claims: Option<CustomClaims>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Whether this user carries the admin claim.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.custom_claims.as_ref().is_some_and(|c| c.admin)
    }

    /// Display name for listings: name, else email, else the ID.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_document_deserializes() {
        // Legacy user docs may carry nothing but an email.
        let user: UserRecord = serde_json::from_str(r#"{"email":"u@x.com"}"#).unwrap();
        assert_eq!(user.status, UserStatus::Active);
        assert!(!user.is_admin());
        assert!(!user.is_deleted);
        assert_eq!(user.display_name(), "u@x.com");
    }

    #[test]
    fn test_admin_claim_detection() {
        let user: UserRecord =
            serde_json::from_str(r#"{"customClaims":{"admin":true,"role":"super_admin"}}"#)
                .unwrap();
        assert!(user.is_admin());
        assert_eq!(
            user.custom_claims.unwrap().role,
            Some(AdminRole::SuperAdmin)
        );
    }

    #[test]
    fn test_banned_status_roundtrip() {
        let user: UserRecord = serde_json::from_str(r#"{"status":"banned"}"#).unwrap();
        assert_eq!(user.status, UserStatus::Banned);
    }
}

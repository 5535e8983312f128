//! Admin listing projection.
//!
//! Admins are not their own collection; they are `users` documents carrying
//! the admin claim. This type is the console's read-side projection of one.

use chrono::{DateTime, Utc};

use alifi_core::{AdminRole, PermissionSet, UserId};

use super::user::UserRecord;

/// A user projected as an admin console operator.
#[derive(Debug, Clone)]
pub struct AdminProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    /// The role's fixed permission set.
    pub permissions: PermissionSet,
    pub last_sign_in: Option<DateTime<Utc>>,
}

impl AdminProfile {
    /// Project a user document into an admin profile, if it carries the
    /// admin claim.
    #[must_use]
    pub fn from_user(user: &UserRecord) -> Option<Self> {
        let claims = user.custom_claims.as_ref().filter(|c| c.admin)?;
        let role = claims.role.unwrap_or_default();
        Some(Self {
            id: user.id.clone(),
            name: user.display_name().to_owned(),
            email: user.email.clone().unwrap_or_default(),
            role,
            permissions: role.permissions(),
            last_sign_in: user.last_active,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_requires_admin_claim() {
        let plain: UserRecord = serde_json::from_str(r#"{"email":"u@x.com"}"#).unwrap();
        assert!(AdminProfile::from_user(&plain).is_none());

        let admin: UserRecord = serde_json::from_str(
            r#"{"email":"a@x.com","customClaims":{"admin":true,"role":"moderator"}}"#,
        )
        .unwrap();
        let profile = AdminProfile::from_user(&admin).unwrap();
        assert_eq!(profile.role, AdminRole::Moderator);
        assert_eq!(profile.permissions.len(), 1);
    }

    #[test]
    fn test_roleless_claim_defaults_to_admin() {
        let user: UserRecord =
            serde_json::from_str(r#"{"customClaims":{"admin":true}}"#).unwrap();
        let profile = AdminProfile::from_user(&user).unwrap();
        assert_eq!(profile.role, AdminRole::Admin);
    }
}

//! Admin roster management.
//!
//! Admins are users carrying the admin claim, so the roster is a projection
//! over the `users` collection. Grants and revocations edit the claim on the
//! user document; the account itself must already exist.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use alifi_core::AdminRole;

use crate::error::ConsoleError;
use crate::gateway::{DocumentGateway, ListQuery};
use crate::models::{AdminProfile, CustomClaims, UserRecord};

/// Read-side roster of console operators.
pub struct AdminManager<D> {
    gateway: D,
    admins: Vec<AdminProfile>,
}

impl<D> AdminManager<D>
where
    D: DocumentGateway,
{
    pub fn new(gateway: D) -> Self {
        Self {
            gateway,
            admins: Vec::new(),
        }
    }

    /// Rebuild the roster by scanning the user collection for the admin
    /// claim. Claims are nested, so the scan filters in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the listing fails or
    /// [`ConsoleError::Validation`] if a document does not deserialize.
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        let snapshots = self.gateway.list("users", ListQuery::all()).await?;
        let mut admins = Vec::new();
        for snapshot in snapshots {
            let mut user: UserRecord = serde_json::from_value(snapshot.data).map_err(|e| {
                ConsoleError::Validation(format!("malformed users/{} document: {e}", snapshot.id))
            })?;
            user.id = alifi_core::UserId::new(snapshot.id);
            if let Some(profile) = AdminProfile::from_user(&user) {
                admins.push(profile);
            }
        }
        admins.sort_by(|a, b| a.email.cmp(&b.email));
        self.admins = admins;
        Ok(())
    }

    #[must_use]
    pub fn admins(&self) -> &[AdminProfile] {
        &self.admins
    }

    /// Grant a role to an existing user, looked up by email.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::NotFound`] if no user document carries the
    /// email; the user must have registered through the app first.
    pub async fn grant_role(
        &mut self,
        email: &str,
        name: &str,
        role: AdminRole,
    ) -> Result<(), ConsoleError> {
        let matches = self
            .gateway
            .list("users", ListQuery::all().filter_eq("email", email))
            .await?;
        let Some(user) = matches.first() else {
            return Err(ConsoleError::NotFound(format!(
                "no registered user with email {email}"
            )));
        };

        let claims = CustomClaims {
            admin: true,
            role: Some(role),
        };
        self.gateway
            .update(
                "users",
                &user.id,
                json!({
                    "name": name,
                    "customClaims": claims,
                    "updatedAt": Utc::now(),
                }),
            )
            .await?;
        info!(email, role = role.display_name(), "admin role granted");
        self.load().await
    }

    /// Remove a user's console access, keeping the account intact.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails.
    pub async fn revoke(&mut self, id: &str) -> Result<(), ConsoleError> {
        self.gateway
            .update(
                "users",
                id,
                json!({
                    "customClaims": CustomClaims::default(),
                    "updatedAt": Utc::now(),
                }),
            )
            .await?;
        info!(user = id, "admin role revoked");
        self.load().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::gateway::memory::MemoryGateway;

    use super::*;

    fn seeded_gateway() -> MemoryGateway {
        let gw = MemoryGateway::new();
        gw.seed_document(
            "users",
            "u1",
            json!({"name": "Root", "email": "root@x.com",
                   "customClaims": {"admin": true, "role": "super_admin"}}),
        );
        gw.seed_document(
            "users",
            "u2",
            json!({"name": "Plain", "email": "plain@x.com"}),
        );
        gw
    }

    #[tokio::test]
    async fn test_roster_only_lists_admins() {
        let mut manager = AdminManager::new(seeded_gateway());
        manager.load().await.unwrap();
        assert_eq!(manager.admins().len(), 1);
        assert_eq!(manager.admins()[0].role, AdminRole::SuperAdmin);
    }

    #[tokio::test]
    async fn test_grant_promotes_existing_user() {
        let mut manager = AdminManager::new(seeded_gateway());
        manager.load().await.unwrap();

        manager
            .grant_role("plain@x.com", "Plain P", AdminRole::Moderator)
            .await
            .unwrap();
        assert_eq!(manager.admins().len(), 2);
        let promoted = manager
            .admins()
            .iter()
            .find(|a| a.email == "plain@x.com")
            .unwrap();
        assert_eq!(promoted.role, AdminRole::Moderator);
        assert_eq!(promoted.name, "Plain P");
    }

    #[tokio::test]
    async fn test_grant_requires_registered_user() {
        let mut manager = AdminManager::new(seeded_gateway());
        let err = manager
            .grant_role("nobody@x.com", "Nobody", AdminRole::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_revoke_keeps_account() {
        let gw = seeded_gateway();
        let mut manager = AdminManager::new(gw.clone());
        manager.load().await.unwrap();

        manager.revoke("u1").await.unwrap();
        assert!(manager.admins().is_empty());
        let doc = gw.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc["customClaims"]["admin"], false);
        assert_eq!(doc["email"], "root@x.com");
    }
}

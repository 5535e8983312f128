//! Veterinarian account provisioning.
//!
//! Creating an account through the identity provider signs the new account
//! in, replacing the admin's session. The flow here threads that constraint:
//! it suppresses session routing for its duration, writes the profile while
//! the new identity is active, then signs the admin back in with the
//! credentials cached at login. Each settle point waits on the identity
//! stream with a bounded timeout rather than sleeping.

use chrono::Utc;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use alifi_core::{Email, VeterinarianId};

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::gateway::{
    AuthGateway, DocumentGateway, Identity, IdentityChanges, ProviderError, ProviderErrorKind,
};
use crate::models::NewVeterinarian;
use crate::session::{CachedCredentials, RoutingSuppression};

/// Collection holding veterinarian profiles.
const VETERINARIANS: &str = "veterinarians";

/// Orchestrates the create-account / write-profile / restore-session flow.
pub struct ProvisioningService<G> {
    gateway: G,
    config: ConsoleConfig,
    suppression: RoutingSuppression,
}

impl<G> ProvisioningService<G>
where
    G: AuthGateway + DocumentGateway,
{
    pub fn new(gateway: G, config: ConsoleConfig, suppression: RoutingSuppression) -> Self {
        Self {
            gateway,
            config,
            suppression,
        }
    }

    /// Provision a veterinarian account and profile, then restore the
    /// admin's session.
    ///
    /// On success the active identity is the admin again and the new
    /// profile is at `veterinarians/{account_id}`.
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::Validation`] if the form is incomplete.
    /// - [`ConsoleError::Provider`] if account creation fails (including
    ///   an already-registered email); nothing has been written.
    /// - [`ConsoleError::OrphanedRecord`] if the account was created but the
    ///   profile write failed; the account exists without a profile.
    /// - [`ConsoleError::SessionIntegrity`] if restoring the admin session
    ///   fails after the account and profile both exist; the operator must
    ///   log in again.
    #[instrument(skip_all, fields(vet_email = %form.email))]
    pub async fn provision(
        &self,
        form: NewVeterinarian,
        admin: &CachedCredentials,
    ) -> Result<VeterinarianId, ConsoleError> {
        form.validate()?;

        // Hold routing off for the whole flow, including error paths.
        let _guard = self.suppression.acquire();
        let mut changes = self.gateway.identity_changes();

        let identity = self
            .gateway
            .create_account(&form.email, &form.password)
            .await?;
        let account_id = identity.id.clone();
        info!(account = %account_id, "veterinarian account created");

        let record = form.into_record(account_id.clone(), Utc::now());
        let doc = serde_json::to_value(&record)
            .map_err(|e| ConsoleError::Validation(format!("unencodable profile: {e}")))?;
        if let Err(source) = self
            .gateway
            .set(VETERINARIANS, account_id.as_str(), doc, false)
            .await
        {
            // The account exists but carries no profile. Surface the ID so
            // the operator can reconcile manually.
            return Err(ConsoleError::OrphanedRecord { account_id, source });
        }

        // Cosmetic; the profile document is the source of truth for the name.
        if let Err(err) = self.gateway.update_display_name(&record.name).await {
            warn!(error = %err, "display name update failed, continuing");
        }

        self.restore_admin_session(&mut changes, admin)
            .await
            .map_err(|source| ConsoleError::SessionIntegrity {
                admin_email: admin.email.clone(),
                source,
            })?;

        info!(account = %account_id, "admin session restored");
        Ok(account_id.into())
    }

    /// Sign the new account out and the admin back in, waiting for each
    /// transition to land on the identity stream.
    async fn restore_admin_session(
        &self,
        changes: &mut IdentityChanges,
        admin: &CachedCredentials,
    ) -> Result<(), ProviderError> {
        self.gateway.sign_out().await?;
        self.settle(changes, Option::is_none).await?;

        self.gateway.sign_in(&admin.email, &admin.password).await?;
        self.settle(changes, |identity| {
            identity_is(identity.as_ref(), &admin.email)
        })
        .await
    }

    /// Wait until the identity stream satisfies `pred`, bounded by the
    /// configured settle timeout.
    async fn settle<F>(&self, changes: &mut IdentityChanges, pred: F) -> Result<(), ProviderError>
    where
        F: FnMut(&Option<Identity>) -> bool,
    {
        timeout(self.config.settle_timeout, changes.wait_for(pred))
            .await
            .map_err(|_| {
                ProviderError::new(
                    ProviderErrorKind::Unavailable,
                    "identity change did not arrive within the settle timeout",
                )
            })?
            .map_err(|_| {
                ProviderError::new(ProviderErrorKind::Unavailable, "identity stream closed")
            })?;
        Ok(())
    }
}

fn identity_is(identity: Option<&Identity>, email: &Email) -> bool {
    identity.is_some_and(|i| i.email == *email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use crate::gateway::memory::MemoryGateway;

    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn form() -> NewVeterinarian {
        NewVeterinarian {
            name: "Dr. A".to_owned(),
            email: email("a@x.com"),
            phone: "123".to_owned(),
            specialization: "Surgery".to_owned(),
            experience: "5y".to_owned(),
            license: "L1".to_owned(),
            password: SecretString::from("vetpw123"),
        }
    }

    async fn signed_in_admin(gw: &MemoryGateway) -> CachedCredentials {
        gw.register_account(&email("admin@x.com"), "adminpw");
        gw.sign_in(&email("admin@x.com"), &SecretString::from("adminpw"))
            .await
            .unwrap();
        CachedCredentials {
            email: email("admin@x.com"),
            password: SecretString::from("adminpw"),
        }
    }

    fn service(gw: &MemoryGateway) -> ProvisioningService<MemoryGateway> {
        ProvisioningService::new(gw.clone(), ConsoleConfig::default(), RoutingSuppression::new())
    }

    #[tokio::test]
    async fn test_provision_writes_profile_and_restores_admin() {
        let gw = MemoryGateway::new();
        let admin = signed_in_admin(&gw).await;

        let vet_id = service(&gw).provision(form(), &admin).await.unwrap();

        let doc = gw
            .get("veterinarians", vet_id.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["specialization"], "Surgery");
        assert_eq!(doc["isVerified"], true);
        assert_eq!(doc["uid"], vet_id.as_str());

        let active = gw.current_identity().unwrap();
        assert_eq!(active.email.as_str(), "admin@x.com");
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_provider_calls() {
        let gw = MemoryGateway::new();
        let admin = signed_in_admin(&gw).await;

        let mut bad = form();
        bad.name = String::new();
        let err = service(&gw).provision(bad, &admin).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
        assert_eq!(gw.document_count("veterinarians"), 0);
        // The admin session was never disturbed.
        assert_eq!(gw.current_identity().unwrap().email.as_str(), "admin@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_surfaces_provider_error() {
        let gw = MemoryGateway::new();
        let admin = signed_in_admin(&gw).await;
        gw.register_account(&email("a@x.com"), "taken");

        let err = service(&gw).provision(form(), &admin).await.unwrap_err();
        match err {
            ConsoleError::Provider(p) => {
                assert_eq!(p.kind, ProviderErrorKind::EmailAlreadyExists);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gw.document_count("veterinarians"), 0);
    }

    #[tokio::test]
    async fn test_profile_write_failure_reports_orphan() {
        let gw = MemoryGateway::new();
        let admin = signed_in_admin(&gw).await;
        gw.fail_writes_to("veterinarians");

        let err = service(&gw).provision(form(), &admin).await.unwrap_err();
        match err {
            ConsoleError::OrphanedRecord { account_id, .. } => {
                // The orphaned account is the active identity.
                assert_eq!(gw.current_identity().unwrap().id, account_id);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_stale_admin_credentials_lose_session() {
        let gw = MemoryGateway::new();
        signed_in_admin(&gw).await;
        let stale = CachedCredentials {
            email: email("admin@x.com"),
            password: SecretString::from("rotated"),
        };

        let err = service(&gw).provision(form(), &stale).await.unwrap_err();
        match err {
            ConsoleError::SessionIntegrity { admin_email, .. } => {
                assert_eq!(admin_email.as_str(), "admin@x.com");
            }
            other => panic!("unexpected error: {other}"),
        }
        // The account and its profile were still created.
        assert_eq!(gw.document_count("veterinarians"), 1);
        assert!(gw.current_identity().is_none());
    }

    #[tokio::test]
    async fn test_routing_stays_suppressed_throughout() {
        let gw = MemoryGateway::new();
        let admin = signed_in_admin(&gw).await;
        let suppression = RoutingSuppression::new();
        let svc = ProvisioningService::new(
            gw.clone(),
            ConsoleConfig::default(),
            suppression.clone(),
        );

        assert!(!suppression.is_active());
        svc.provision(form(), &admin).await.unwrap();
        assert!(!suppression.is_active());

        // While the flow ran, every identity flip stayed behind the guard;
        // the final published identity is the admin's.
        assert_eq!(gw.current_identity().unwrap().email.as_str(), "admin@x.com");
    }
}

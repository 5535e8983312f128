//! Admin session lifecycle.
//!
//! Drives the console between its three views (logged out, verifying admin
//! status, dashboard) off the gateway's identity-change stream. Identity
//! changes caused by the console's own background work (see
//! [`crate::provisioning`]) are suppressed with an RAII guard so they never
//! reroute the operator mid-task.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use tracing::{debug, info, warn};

use alifi_core::{AccountId, Email};

use crate::error::ConsoleError;
use crate::gateway::{
    AuthGateway, DocumentGateway, Identity, IdentityChanges, ProviderError, ProviderErrorKind,
};
use crate::models::UserRecord;

/// The admin's credentials, cached in memory after a successful login so the
/// session can be restored after provisioning flows replace the active
/// identity. Never persisted.
#[derive(Debug, Clone)]
pub struct CachedCredentials {
    pub email: Email,
    pub password: SecretString,
}

/// Counted suppression flag shared between the session controller and
/// background flows. Routing reactions to identity changes are disabled while
/// at least one [`RoutingGuard`] is alive.
#[derive(Debug, Clone, Default)]
pub struct RoutingSuppression {
    depth: Arc<AtomicUsize>,
}

impl RoutingSuppression {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress routing until the returned guard is dropped. Reentrant:
    /// nested acquisitions stack, and routing resumes when the last guard
    /// goes away.
    #[must_use]
    pub fn acquire(&self) -> RoutingGuard {
        self.depth.fetch_add(1, Ordering::SeqCst);
        RoutingGuard {
            depth: Arc::clone(&self.depth),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

/// Keeps routing suppressed while alive. Releases on drop, including on
/// early return and panic unwind.
#[derive(Debug)]
pub struct RoutingGuard {
    depth: Arc<AtomicUsize>,
}

impl Drop for RoutingGuard {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The view the console is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView {
    /// Login screen; no identity or a rejected one.
    LoggedOut,
    /// An identity arrived and its admin claim is being verified.
    CheckingAdminStatus,
    /// Verified admin; the console proper.
    Dashboard,
}

/// What the controller did with an identity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingOutcome {
    /// The view changed (or was confirmed) in response to the event.
    Routed(SessionView),
    /// A background flow holds the routing guard; the view was left alone.
    Suppressed,
    /// The identity is not an admin; it was signed out and the view reset.
    AccessDenied,
}

/// Mediates between the identity stream and the console's view state.
pub struct SessionController<G> {
    gateway: G,
    changes: IdentityChanges,
    suppression: RoutingSuppression,
    view: SessionView,
    cached: Option<CachedCredentials>,
}

impl<G> SessionController<G>
where
    G: AuthGateway + DocumentGateway,
{
    pub fn new(gateway: G) -> Self {
        let changes = gateway.identity_changes();
        Self {
            gateway,
            changes,
            suppression: RoutingSuppression::new(),
            view: SessionView::LoggedOut,
            cached: None,
        }
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.view
    }

    /// The suppression handle, for background flows that replace the active
    /// identity and must not trigger rerouting while they do.
    #[must_use]
    pub fn suppression(&self) -> RoutingSuppression {
        self.suppression.clone()
    }

    /// Suppress routing until the returned guard drops.
    #[must_use]
    pub fn suppress_routing(&self) -> RoutingGuard {
        self.suppression.acquire()
    }

    /// The credentials cached by the last successful [`login`](Self::login).
    #[must_use]
    pub fn cached_credentials(&self) -> Option<&CachedCredentials> {
        self.cached.as_ref()
    }

    /// Sign in and cache the credentials for later session restoration.
    ///
    /// Routing (and the admin check) happens when the resulting identity
    /// change is processed, not here.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the provider rejects the
    /// credentials; nothing is cached in that case.
    pub async fn login(&mut self, email: Email, password: SecretString) -> Result<(), ConsoleError> {
        self.gateway.sign_in(&email, &password).await?;
        self.cached = Some(CachedCredentials { email, password });
        Ok(())
    }

    /// Sign out and drop the cached credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the provider rejects the
    /// request; the cache is cleared regardless.
    pub async fn logout(&mut self) -> Result<(), ConsoleError> {
        self.cached = None;
        self.gateway.sign_out().await?;
        Ok(())
    }

    /// Consume one pending identity change, if any, and route on it.
    ///
    /// Returns `None` when the stream has no new value.
    ///
    /// # Errors
    ///
    /// Propagates failures from the admin verification read.
    pub async fn process_pending_change(&mut self) -> Result<Option<RoutingOutcome>, ConsoleError> {
        if !self.changes.has_changed().map_err(|_| {
            ConsoleError::Provider(ProviderError::new(
                ProviderErrorKind::Unavailable,
                "identity stream closed",
            ))
        })? {
            return Ok(None);
        }
        let identity = self.changes.borrow_and_update().clone();
        self.handle_identity_change(identity).await.map(Some)
    }

    /// React to a change in the active identity.
    ///
    /// While a [`RoutingGuard`] is alive the event is acknowledged but the
    /// view is left untouched. Otherwise a new identity is verified against
    /// its `users/{id}` document: signed-in admins land on the dashboard,
    /// anyone else is signed out on the spot.
    ///
    /// # Errors
    ///
    /// Propagates failures reading the user document or performing the
    /// rejection sign-out.
    pub async fn handle_identity_change(
        &mut self,
        identity: Option<Identity>,
    ) -> Result<RoutingOutcome, ConsoleError> {
        if self.suppression.is_active() {
            debug!(suppressed = true, "identity change during background flow");
            return Ok(RoutingOutcome::Suppressed);
        }

        let Some(identity) = identity else {
            self.view = SessionView::LoggedOut;
            return Ok(RoutingOutcome::Routed(SessionView::LoggedOut));
        };

        self.view = SessionView::CheckingAdminStatus;
        if self.verify_admin(&identity.id).await? {
            info!(email = %identity.email, "admin session established");
            self.view = SessionView::Dashboard;
            Ok(RoutingOutcome::Routed(SessionView::Dashboard))
        } else {
            warn!(email = %identity.email, "non-admin sign-in rejected");
            self.cached = None;
            self.gateway.sign_out().await?;
            // The sign-out above is our own doing; consume its notification
            // so it is not routed as a second event.
            let _ = self.changes.borrow_and_update();
            self.view = SessionView::LoggedOut;
            Ok(RoutingOutcome::AccessDenied)
        }
    }

    /// Whether the account's user document carries the admin claim.
    async fn verify_admin(&self, id: &AccountId) -> Result<bool, ConsoleError> {
        let Some(doc) = self.gateway.get("users", id.as_str()).await? else {
            return Ok(false);
        };
        let record: UserRecord = serde_json::from_value(doc)
            .map_err(|e| ConsoleError::Validation(format!("malformed user document: {e}")))?;
        Ok(record.is_admin())
    }
}

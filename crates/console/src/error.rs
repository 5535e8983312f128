//! Unified error handling for the console.
//!
//! Every flow recovers locally: it aborts, surfaces one of these errors to
//! the notification surface, and never retries on its own.

use thiserror::Error;

use alifi_core::{AccountId, Email};

use crate::gateway::{ProviderError, ProviderErrorKind};

/// Severity of an error when presented on the notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Input problem the operator can fix and resubmit.
    Warning,
    /// The operation failed; state is consistent.
    Error,
    /// The operation left state an operator must manually reconcile.
    Critical,
}

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Local pre-flight validation failed; no provider call was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A backend provider call failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// An auth account was created but its profile write failed, leaving an
    /// account with no corresponding record. There is no compensating
    /// transaction; the account must be cleaned up manually.
    #[error("orphaned account {account_id}: profile write failed")]
    OrphanedRecord {
        /// The auth account left without a profile.
        account_id: AccountId,
        /// The underlying write failure.
        #[source]
        source: ProviderError,
    },

    /// The intended operation succeeded but the admin operator's own session
    /// could not be restored; the operator must re-authenticate manually.
    #[error("admin session for {admin_email} could not be restored")]
    SessionIntegrity {
        /// The admin whose session was lost.
        admin_email: Email,
        /// The underlying sign-in failure.
        #[source]
        source: ProviderError,
    },
}

impl ConsoleError {
    /// Classify this error for the notification surface.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Validation(_) => Severity::Warning,
            Self::NotFound(_) | Self::Provider(_) => Severity::Error,
            Self::OrphanedRecord { .. } | Self::SessionIntegrity { .. } => Severity::Critical,
        }
    }

    /// A message suitable for showing to the operator.
    ///
    /// Distinguishes the failure modes the operator must react to
    /// differently without leaking provider internals.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::Provider(e) => match e.kind {
                ProviderErrorKind::EmailAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                ProviderErrorKind::InvalidCredential => "Invalid email or password".to_owned(),
                _ => "The backend request failed. Please try again".to_owned(),
            },
            Self::OrphanedRecord { account_id, .. } => format!(
                "Account {account_id} was created but its profile could not be written. \
                 Manual cleanup is required"
            ),
            Self::SessionIntegrity { admin_email, .. } => format!(
                "The account was created, but your session as {admin_email} could not be \
                 restored. Please sign in again"
            ),
        }
    }
}

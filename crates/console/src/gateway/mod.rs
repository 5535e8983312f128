//! Backend gateway capability traits.
//!
//! The console consumes the backend (identity provider, document database,
//! blob storage) through the traits in this module. The traits are
//! schema-agnostic: documents cross the boundary as `serde_json::Value`, and
//! the typed layer above ([`crate::models`]) converts.
//!
//! The [`memory`] module provides an in-memory implementation used by the
//! test suite.

pub mod memory;

use serde_json::Value;
use tokio::sync::watch;

use alifi_core::{AccountId, Email};
use secrecy::SecretString;

/// Classification of a backend provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Account creation failed because the email is already registered.
    EmailAlreadyExists,
    /// Sign-in failed because the credentials are wrong.
    InvalidCredential,
    /// The referenced document or account does not exist.
    NotFound,
    /// A network-level failure reaching the provider.
    Network,
    /// Blob storage operation failed.
    Storage,
    /// The provider is reachable but refused or timed out internally.
    Unavailable,
}

/// Error returned by any backend gateway operation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct ProviderError {
    /// Failure classification.
    pub kind: ProviderErrorKind,
    /// Provider-supplied message.
    pub message: String,
}

impl ProviderError {
    /// Create a new provider error.
    #[must_use]
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The active authenticated principal in the client process.
///
/// At most one identity is active per gateway at any time; it is created by
/// sign-in (or account creation, which signs the new account in as a provider
/// side effect) and destroyed by sign-out or replaced by another sign-in.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Provider-assigned account ID.
    pub id: AccountId,
    /// The account's email address.
    pub email: Email,
    /// Display name, if one has been set.
    pub display_name: Option<String>,
    /// Opaque session token issued by the provider. Never logged.
    pub token: SecretString,
}

/// A change notification stream for the active identity.
///
/// `None` means signed out. The receiver always observes the latest value,
/// so a subscriber that handles notifications slowly sees the most recent
/// identity rather than every intermediate one.
pub type IdentityChanges = watch::Receiver<Option<Identity>>;

/// Authentication capability of the backend gateway.
pub trait AuthGateway {
    /// Sign in with email and password. The returned identity becomes active.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::InvalidCredential`] for a wrong email or
    /// password, [`ProviderErrorKind::Network`] for transport failures.
    fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, ProviderError>>;

    /// Sign out, clearing the active identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    fn sign_out(&self) -> impl Future<Output = Result<(), ProviderError>>;

    /// Create a new account.
    ///
    /// Provider side effect: the new account becomes the active identity.
    /// Callers that must preserve an existing session are responsible for
    /// restoring it afterwards (see [`crate::provisioning`]).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::EmailAlreadyExists`] if the email is
    /// already registered.
    fn create_account(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, ProviderError>>;

    /// Update the active identity's display name.
    ///
    /// # Errors
    ///
    /// Returns an error if no identity is active or the provider rejects
    /// the update.
    fn update_display_name(&self, name: &str) -> impl Future<Output = Result<(), ProviderError>>;

    /// The currently active identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Subscribe to identity-change notifications.
    fn identity_changes(&self) -> IdentityChanges;
}

/// A document read from the store, paired with its ID.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// The document's ID within its collection.
    pub id: String,
    /// The document body.
    pub data: Value,
}

/// Comparison operator for a list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Field equals the value.
    Eq,
    /// Field is contained in the value (which must be an array).
    In,
}

/// A single field filter in a list query.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    /// Document field name.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Comparison value.
    pub value: Value,
}

/// Sort direction for an ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// An ordering key in a list query.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// Document field name.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

/// Query parameters for listing documents in a collection.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Field filters, all of which must match.
    pub filters: Vec<FieldFilter>,
    /// Ordering keys, applied in sequence.
    pub order_by: Vec<OrderBy>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// An unfiltered, unordered query.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    #[must_use]
    pub fn filter_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_owned(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    /// Add an `in` filter; `values` are the admissible field values.
    #[must_use]
    pub fn filter_in(mut self, field: &str, values: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_owned(),
            op: FilterOp::In,
            value: values.into(),
        });
        self
    }

    /// Add an ascending ordering key.
    #[must_use]
    pub fn order_asc(mut self, field: &str) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_owned(),
            direction: SortDirection::Ascending,
        });
        self
    }

    /// Add a descending ordering key.
    #[must_use]
    pub fn order_desc(mut self, field: &str) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_owned(),
            direction: SortDirection::Descending,
        });
        self
    }

    /// Cap the number of returned documents.
    #[must_use]
    pub const fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// A single operation in an atomic batch write.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Create or replace a document (merge if `merge` is set).
    Set {
        collection: String,
        id: String,
        data: Value,
        merge: bool,
    },
    /// Merge fields into an existing document.
    Update {
        collection: String,
        id: String,
        data: Value,
    },
    /// Delete a document.
    Delete { collection: String, id: String },
}

/// Document database capability of the backend gateway.
///
/// Collection names may be slash-separated paths to address subcollections,
/// e.g. `users/{id}/notifications`.
pub trait DocumentGateway {
    /// Fetch a single document.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails. A missing document is
    /// `Ok(None)`, not an error.
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Value>, ProviderError>>;

    /// List documents matching a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    fn list(
        &self,
        collection: &str,
        query: ListQuery,
    ) -> impl Future<Output = Result<Vec<DocumentSnapshot>, ProviderError>>;

    /// Create a document with a provider-assigned ID; returns the ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    fn create(
        &self,
        collection: &str,
        data: Value,
    ) -> impl Future<Output = Result<String, ProviderError>>;

    /// Create or replace a document at a known ID.
    ///
    /// With `merge`, existing fields not present in `data` are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> impl Future<Output = Result<(), ProviderError>>;

    /// Merge fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::NotFound`] if the document does not
    /// exist.
    fn update(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> impl Future<Output = Result<(), ProviderError>>;

    /// Delete a document. Deleting a missing document is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    fn delete(&self, collection: &str, id: &str)
    -> impl Future<Output = Result<(), ProviderError>>;

    /// Apply a batch of writes atomically: either every operation takes
    /// effect or none does.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is rejected; no partial state remains.
    fn batch_write(&self, ops: Vec<WriteOp>)
    -> impl Future<Output = Result<(), ProviderError>>;
}

/// Blob storage capability of the backend gateway.
pub trait BlobGateway {
    /// Upload a blob and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::Storage`] if the upload fails.
    fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String, ProviderError>>;
}

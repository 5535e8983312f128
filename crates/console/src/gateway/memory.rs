//! In-memory backend gateway.
//!
//! HashMap-backed implementation of the gateway traits, mirroring the
//! provider behaviors the console depends on: account creation signs the new
//! account in, identity changes publish on a watch channel, and batch writes
//! are atomic. Backs the test suite and offline use; data is lost on drop.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use alifi_core::{AccountId, Email};

use super::{
    AuthGateway, BlobGateway, DocumentGateway, DocumentSnapshot, FilterOp, Identity,
    IdentityChanges, ListQuery, ProviderError, ProviderErrorKind, SortDirection, WriteOp,
};

#[derive(Debug, Clone)]
struct StoredAccount {
    id: AccountId,
    password: String,
    display_name: Option<String>,
}

type Collections = HashMap<String, BTreeMap<String, Value>>;

#[derive(Debug)]
struct Inner {
    accounts: Mutex<HashMap<String, StoredAccount>>,
    collections: Mutex<Collections>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    identity_tx: watch::Sender<Option<Identity>>,
    batch_calls: AtomicUsize,
    failing_batches: Mutex<HashSet<usize>>,
}

/// In-memory backend gateway.
///
/// Cloning is cheap; clones share the same store and identity stream.
#[derive(Debug, Clone)]
pub struct MemoryGateway {
    inner: Arc<Inner>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    /// Create an empty gateway with no accounts and no active identity.
    #[must_use]
    pub fn new() -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                accounts: Mutex::new(HashMap::new()),
                collections: Mutex::new(HashMap::new()),
                blobs: Mutex::new(HashMap::new()),
                identity_tx,
                batch_calls: AtomicUsize::new(0),
                failing_batches: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Seed an account without signing it in. Returns the account ID.
    pub fn register_account(&self, email: &Email, password: &str) -> AccountId {
        let id = AccountId::new(Uuid::new_v4().to_string());
        self.lock_accounts().insert(
            email.as_str().to_owned(),
            StoredAccount {
                id: id.clone(),
                password: password.to_owned(),
                display_name: None,
            },
        );
        id
    }

    /// Seed a document at a known ID.
    pub fn seed_document(&self, collection: &str, id: &str, data: Value) {
        self.lock_collections()
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), data);
    }

    /// Number of documents in a collection.
    #[must_use]
    pub fn document_count(&self, collection: &str) -> usize {
        self.lock_collections()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Fault injection: the Nth, Mth, ... `batch_write` calls (zero-based,
    /// counted across the gateway's lifetime) fail atomically.
    pub fn fail_batch_writes(&self, call_indices: impl IntoIterator<Item = usize>) {
        self.inner
            .failing_batches
            .lock()
            .expect("lock poisoned")
            .extend(call_indices);
    }

    /// Fault injection: the next write to the given collection fails.
    pub fn fail_writes_to(&self, collection: &str) {
        self.lock_collections()
            .insert(poisoned_key(collection), BTreeMap::new());
    }

    fn lock_accounts(&self) -> MutexGuard<'_, HashMap<String, StoredAccount>> {
        self.inner.accounts.lock().expect("lock poisoned")
    }

    fn lock_collections(&self) -> MutexGuard<'_, Collections> {
        self.inner.collections.lock().expect("lock poisoned")
    }

    fn set_active(&self, identity: Option<Identity>) {
        // send_replace stores the value even when no receiver is alive;
        // current_identity must track sign-ins without subscribers.
        self.inner.identity_tx.send_replace(identity);
    }

    fn check_write_fault(
        collections: &mut Collections,
        collection: &str,
    ) -> Result<(), ProviderError> {
        if collections.remove(&poisoned_key(collection)).is_some() {
            return Err(ProviderError::new(
                ProviderErrorKind::Unavailable,
                format!("injected write failure for {collection}"),
            ));
        }
        Ok(())
    }
}

fn poisoned_key(collection: &str) -> String {
    format!("__fail__{collection}")
}

fn identity_for(account: &StoredAccount, email: &Email) -> Identity {
    Identity {
        id: account.id.clone(),
        email: email.clone(),
        display_name: account.display_name.clone(),
        token: SecretString::from(Uuid::new_v4().to_string()),
    }
}

impl AuthGateway for MemoryGateway {
    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, ProviderError> {
        let identity = {
            let accounts = self.lock_accounts();
            let account = accounts.get(email.as_str()).ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::InvalidCredential, "unknown email")
            })?;
            if account.password != password.expose_secret() {
                return Err(ProviderError::new(
                    ProviderErrorKind::InvalidCredential,
                    "wrong password",
                ));
            }
            identity_for(account, email)
        };
        self.set_active(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.set_active(None);
        Ok(())
    }

    async fn create_account(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, ProviderError> {
        let identity = {
            let mut accounts = self.lock_accounts();
            if accounts.contains_key(email.as_str()) {
                return Err(ProviderError::new(
                    ProviderErrorKind::EmailAlreadyExists,
                    "email already registered",
                ));
            }
            let account = StoredAccount {
                id: AccountId::new(Uuid::new_v4().to_string()),
                password: password.expose_secret().to_owned(),
                display_name: None,
            };
            accounts.insert(email.as_str().to_owned(), account.clone());
            identity_for(&account, email)
        };
        // Provider side effect: the new account becomes the active identity.
        self.set_active(Some(identity.clone()));
        Ok(identity)
    }

    async fn update_display_name(&self, name: &str) -> Result<(), ProviderError> {
        let active = self.current_identity().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::InvalidCredential, "no active identity")
        })?;
        let mut accounts = self.lock_accounts();
        let account = accounts.get_mut(active.email.as_str()).ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::NotFound, "account removed")
        })?;
        account.display_name = Some(name.to_owned());
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.inner.identity_tx.borrow().clone()
    }

    fn identity_changes(&self) -> IdentityChanges {
        self.inner.identity_tx.subscribe()
    }
}

/// Whether a document matches every filter in the query.
fn matches_filters(data: &Value, query: &ListQuery) -> bool {
    query.filters.iter().all(|f| {
        let field_val = data.get(&f.field).unwrap_or(&Value::Null);
        match f.op {
            FilterOp::Eq => field_val == &f.value,
            FilterOp::In => f
                .value
                .as_array()
                .is_some_and(|candidates| candidates.contains(field_val)),
        }
    })
}

/// Total order over the JSON values the console stores: null, then booleans,
/// then numbers, then strings (timestamps are RFC 3339 strings, so their
/// lexicographic order is chronological).
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 4,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn sort_snapshots(snapshots: &mut [DocumentSnapshot], query: &ListQuery) {
    if query.order_by.is_empty() {
        return;
    }
    snapshots.sort_by(|a, b| {
        for key in &query.order_by {
            let av = a.data.get(&key.field).unwrap_or(&Value::Null);
            let bv = b.data.get(&key.field).unwrap_or(&Value::Null);
            let ord = match key.direction {
                SortDirection::Ascending => compare_values(av, bv),
                SortDirection::Descending => compare_values(bv, av),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Shallow-merge `patch`'s top-level fields into `target`.
fn merge_into(target: &mut Value, patch: Value) {
    if let (Value::Object(target_map), Value::Object(patch_map)) = (target, patch) {
        for (k, v) in patch_map {
            target_map.insert(k, v);
        }
    }
}

impl DocumentGateway for MemoryGateway {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, ProviderError> {
        Ok(self
            .lock_collections()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(
        &self,
        collection: &str,
        query: ListQuery,
    ) -> Result<Vec<DocumentSnapshot>, ProviderError> {
        let mut snapshots: Vec<DocumentSnapshot> = self
            .lock_collections()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| matches_filters(data, &query))
                    .map(|(id, data)| DocumentSnapshot {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        sort_snapshots(&mut snapshots, &query);
        if let Some(limit) = query.limit {
            snapshots.truncate(limit);
        }
        Ok(snapshots)
    }

    async fn create(&self, collection: &str, data: Value) -> Result<String, ProviderError> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.lock_collections();
        Self::check_write_fault(&mut collections, collection)?;
        collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), ProviderError> {
        let mut collections = self.lock_collections();
        Self::check_write_fault(&mut collections, collection)?;
        let docs = collections.entry(collection.to_owned()).or_default();
        if merge {
            if let Some(existing) = docs.get_mut(id) {
                merge_into(existing, data);
                return Ok(());
            }
        }
        docs.insert(id.to_owned(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> Result<(), ProviderError> {
        let mut collections = self.lock_collections();
        Self::check_write_fault(&mut collections, collection)?;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| {
                ProviderError::new(
                    ProviderErrorKind::NotFound,
                    format!("{collection}/{id} does not exist"),
                )
            })?;
        merge_into(existing, data);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ProviderError> {
        let mut collections = self.lock_collections();
        Self::check_write_fault(&mut collections, collection)?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), ProviderError> {
        let call = self.inner.batch_calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self
            .inner
            .failing_batches
            .lock()
            .expect("lock poisoned")
            .remove(&call)
        {
            return Err(ProviderError::new(
                ProviderErrorKind::Unavailable,
                format!("injected failure for batch {call}"),
            ));
        }

        let mut collections = self.lock_collections();

        // Validate first so the batch applies atomically.
        for op in &ops {
            if let WriteOp::Update { collection, id, .. } = op {
                let exists = collections
                    .get(collection)
                    .is_some_and(|docs| docs.contains_key(id));
                if !exists {
                    return Err(ProviderError::new(
                        ProviderErrorKind::NotFound,
                        format!("{collection}/{id} does not exist"),
                    ));
                }
            }
        }

        for op in ops {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                    merge,
                } => {
                    let docs = collections.entry(collection).or_default();
                    if merge {
                        if let Some(existing) = docs.get_mut(&id) {
                            merge_into(existing, data);
                            continue;
                        }
                    }
                    docs.insert(id, data);
                }
                WriteOp::Update {
                    collection,
                    id,
                    data,
                } => {
                    if let Some(existing) =
                        collections.get_mut(&collection).and_then(|d| d.get_mut(&id))
                    {
                        merge_into(existing, data);
                    }
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
            }
        }
        Ok(())
    }
}

impl BlobGateway for MemoryGateway {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, ProviderError> {
        if path.is_empty() {
            return Err(ProviderError::new(
                ProviderErrorKind::Storage,
                "empty blob path",
            ));
        }
        self.inner
            .blobs
            .lock()
            .expect("lock poisoned")
            .insert(path.to_owned(), bytes);
        Ok(format!("mem://{path}"))
    }
}

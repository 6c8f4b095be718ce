//! Credential store boundary.
//!
//! Defines the lookup contract the authenticator depends on without making
//! any storage assumptions. Concrete stores live in `keyward-infra`.

use std::sync::Arc;

use thiserror::Error;

use keyward_core::PrincipalId;

use crate::credential::CredentialRecord;
use crate::matcher::MatcherError;

/// Credential store operation error.
///
/// `Unavailable` is the only variant [`CredentialStore::lookup`] may return:
/// a missing principal is `Ok(None)`, never an error. The remaining variants
/// belong to the write paths of concrete stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or is in an unusable state.
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    /// A write targeted a principal that does not exist.
    #[error("principal not found: {0}")]
    NotFound(PrincipalId),

    /// A write would overwrite an existing principal.
    #[error("principal already registered: {0}")]
    Conflict(PrincipalId),

    /// Hashing a new secret failed.
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Read side of credential persistence.
///
/// ## Contract
///
/// - `Ok(Some(record))` only for a principal that exists; the record's
///   `principal_id` equals the requested one.
/// - `Ok(None)` for a principal that does not exist. Absence is never an
///   empty record.
/// - `Err(StoreError::Unavailable)` for transport/storage failures.
/// - No side effects observable to the caller (caches are fine).
///
/// Implementations must support concurrent reads. They may also support
/// writes (credential rotation); callers tolerate a record changing between
/// two lookups.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, principal_id: &PrincipalId) -> Result<Option<CredentialRecord>, StoreError>;
}

impl<S> CredentialStore for &S
where
    S: CredentialStore + ?Sized,
{
    fn lookup(&self, principal_id: &PrincipalId) -> Result<Option<CredentialRecord>, StoreError> {
        (**self).lookup(principal_id)
    }
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn lookup(&self, principal_id: &PrincipalId) -> Result<Option<CredentialRecord>, StoreError> {
        (**self).lookup(principal_id)
    }
}

impl<S> CredentialStore for Box<S>
where
    S: CredentialStore + ?Sized,
{
    fn lookup(&self, principal_id: &PrincipalId) -> Result<Option<CredentialRecord>, StoreError> {
        (**self).lookup(principal_id)
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::info;

use keyward_auth::{
    CredentialRecord, CredentialStore, PermissionSet, SecretMatcher, StoreError,
};
use keyward_core::PrincipalId;

/// In-memory credential store.
///
/// Intended for tests/dev. Reads take a shared lock, so lookups from many
/// threads proceed concurrently; writes (registration, rotation) are
/// serialized.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<PrincipalId, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record as-is.
    pub fn insert(&self, record: CredentialRecord) -> Result<(), StoreError> {
        let mut records = self.write()?;
        records.insert(record.principal_id.clone(), record);
        Ok(())
    }

    /// Register a new principal, encoding `raw_secret` through `matcher`.
    ///
    /// Fails with `Conflict` if the principal already exists.
    pub fn register<M>(
        &self,
        principal_id: PrincipalId,
        raw_secret: &str,
        granted_permissions: PermissionSet,
        matcher: &M,
    ) -> Result<(), StoreError>
    where
        M: SecretMatcher + ?Sized,
    {
        // Hash before taking the lock; Argon2 is deliberately slow.
        let secret_hash = matcher.encode(raw_secret)?;

        let mut records = self.write()?;
        if records.contains_key(&principal_id) {
            return Err(StoreError::Conflict(principal_id));
        }

        info!(principal = %principal_id, "principal registered");
        records.insert(
            principal_id.clone(),
            CredentialRecord::new(principal_id, secret_hash, granted_permissions),
        );
        Ok(())
    }

    /// Replace the stored secret of an existing principal.
    pub fn rotate_secret<M>(
        &self,
        principal_id: &PrincipalId,
        new_secret: &str,
        matcher: &M,
    ) -> Result<(), StoreError>
    where
        M: SecretMatcher + ?Sized,
    {
        let secret_hash = matcher.encode(new_secret)?;

        let mut records = self.write()?;
        let record = records
            .get_mut(principal_id)
            .ok_or_else(|| StoreError::NotFound(principal_id.clone()))?;
        record.secret_hash = secret_hash;

        info!(principal = %principal_id, "secret rotated");
        Ok(())
    }

    /// Replace the granted permissions of an existing principal.
    pub fn set_permissions(
        &self,
        principal_id: &PrincipalId,
        granted_permissions: PermissionSet,
    ) -> Result<(), StoreError> {
        let mut records = self.write()?;
        let record = records
            .get_mut(principal_id)
            .ok_or_else(|| StoreError::NotFound(principal_id.clone()))?;
        record.granted_permissions = granted_permissions;
        Ok(())
    }

    /// Remove a principal. Returns whether it existed.
    pub fn remove(&self, principal_id: &PrincipalId) -> Result<bool, StoreError> {
        let mut records = self.write()?;
        Ok(records.remove(principal_id).is_some())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.records
            .read()
            .map(|r| r.len())
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<PrincipalId, CredentialRecord>>, StoreError>
    {
        self.records
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, principal_id: &PrincipalId) -> Result<Option<CredentialRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;

        Ok(records.get(principal_id).cloned())
    }
}

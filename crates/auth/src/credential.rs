//! Stored credential representation.

use keyward_core::PrincipalId;

use crate::permissions::PermissionSet;

/// One-way encoded secret as persisted by a credential store.
///
/// Opaque bytes: for the Argon2 matcher this is a PHC string, but nothing
/// outside the matcher may rely on that. There is deliberately no way to
/// compare a `SecretHash` against a plaintext secret other than
/// [`SecretMatcher::verify`](crate::SecretMatcher::verify).
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(Vec<u8>);

impl SecretHash {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretHash(<redacted {} bytes>)", self.0.len())
    }
}

/// A principal's stored secret and the permissions it is granted.
///
/// Owned by the credential store. The authenticator only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub principal_id: PrincipalId,
    pub secret_hash: SecretHash,
    pub granted_permissions: PermissionSet,
}

impl CredentialRecord {
    pub fn new(
        principal_id: PrincipalId,
        secret_hash: SecretHash,
        granted_permissions: PermissionSet,
    ) -> Self {
        Self {
            principal_id,
            secret_hash,
            granted_permissions,
        }
    }
}

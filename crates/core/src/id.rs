//! Strongly-typed principal identifier.

use core::str::FromStr;
use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Upper bound on the encoded length of a principal identifier.
pub const MAX_PRINCIPAL_ID_LEN: usize = 256;

/// Identity of a principal (human user, service account, etc).
///
/// Opaque and immutable once issued. The only guarantees are the ones checked
/// by [`PrincipalId::parse`]: non-blank, no control characters, bounded length.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Validate and wrap a raw identifier.
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();

        if raw.trim().is_empty() {
            return Err(DomainError::invalid_id("PrincipalId: empty"));
        }
        if raw.len() > MAX_PRINCIPAL_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "PrincipalId: longer than {MAX_PRINCIPAL_ID_LEN} bytes"
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(DomainError::invalid_id(
                "PrincipalId: contains control characters",
            ));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PrincipalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PrincipalId> for String {
    fn from(value: PrincipalId) -> Self {
        value.0
    }
}

impl AsRef<str> for PrincipalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<PrincipalId, _>` be queried with a plain `&str`.
impl Borrow<str> for PrincipalId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl crate::ValueObject for PrincipalId {}

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of permissions granted to a principal.
///
/// Ordered so that iteration (and therefore logging and equality checks in
/// tests) is deterministic.
pub type PermissionSet = BTreeSet<Permission>;

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "products.read").
/// A special wildcard permission `"*"` grants everything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: &'static str = "*";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn wildcard() -> Self {
        Self(Cow::Borrowed(Self::WILDCARD))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl keyward_core::ValueObject for Permission {}

/// Build a [`PermissionSet`] from anything permission-like.
pub fn permission_set<I, P>(perms: I) -> PermissionSet
where
    I: IntoIterator<Item = P>,
    P: Into<Permission>,
{
    perms.into_iter().map(Into::into).collect()
}

use thiserror::Error;

use crate::authenticate::AuthenticatedPrincipal;
use crate::permissions::Permission;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize an authenticated principal for one permission.
///
/// - No IO
/// - No panics
/// - Wildcard `*` grants everything
pub fn authorize(
    principal: &AuthenticatedPrincipal,
    required: &Permission,
) -> Result<(), AuthzError> {
    if principal.has_permission(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Authorize against every permission in `required`, failing on the first
/// one that is missing (in slice order).
pub fn authorize_all(
    principal: &AuthenticatedPrincipal,
    required: &[Permission],
) -> Result<(), AuthzError> {
    required.iter().try_for_each(|p| authorize(principal, p))
}

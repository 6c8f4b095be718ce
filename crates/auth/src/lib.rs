//! `keyward-auth` — credential verification boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: stores and
//! hashing schemes plug in through the [`CredentialStore`] and
//! [`SecretMatcher`] traits.

pub mod authenticate;
pub mod authorize;
pub mod config;
pub mod credential;
pub mod filter;
pub mod matcher;
pub mod permissions;
pub mod store;

pub use authenticate::{
    AuthError, AuthenticatedPrincipal, AuthenticationResult, Authenticator, INVALID_CREDENTIALS,
};
pub use authorize::{authorize, authorize_all, AuthzError};
pub use config::{ConfigError, MatcherConfig};
pub use credential::{CredentialRecord, SecretHash};
pub use filter::{filter_owned, retain_owned, Owned};
pub use matcher::{Argon2SecretMatcher, MatcherError, SecretMatcher};
pub use permissions::{permission_set, Permission, PermissionSet};
pub use store::{CredentialStore, StoreError};

pub use keyward_core::PrincipalId;

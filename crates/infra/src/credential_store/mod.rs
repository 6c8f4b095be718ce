//! Credential store implementations.
//!
//! Both stores implement [`keyward_auth::CredentialStore`] and can be handed
//! straight to an `Authenticator`.

pub mod caching;
pub mod in_memory;

pub use caching::CachingCredentialStore;
pub use in_memory::InMemoryCredentialStore;

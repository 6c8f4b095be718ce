//! Infrastructure layer: concrete credential stores and their configuration.

pub mod config;
pub mod credential_store;

pub use config::CacheConfig;
pub use credential_store::{CachingCredentialStore, InMemoryCredentialStore};

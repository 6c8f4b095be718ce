//! `keyward-core` — identity building blocks shared by every keyward crate.
//!
//! This crate contains **pure** primitives (no storage, no hashing, no IO).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::PrincipalId;
pub use value_object::ValueObject;

//! One-way secret encoding and verification.
//!
//! # Example
//! ```
//! use keyward_auth::{Argon2SecretMatcher, MatcherConfig, SecretMatcher};
//!
//! let matcher = Argon2SecretMatcher::new(MatcherConfig::insecure_fast()).unwrap();
//! let hash = matcher.encode("correct-pw").unwrap();
//!
//! assert!(matcher.verify("correct-pw", &hash));
//! assert!(!matcher.verify("wrong", &hash));
//! ```

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

use crate::config::MatcherConfig;
use crate::credential::SecretHash;

const FILLER_SECRET: &str = "keyward-unparseable-hash-filler";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatcherError {
    #[error("secret hashing failed: {0}")]
    Hash(String),

    #[error("invalid matcher parameters: {0}")]
    InvalidParams(String),
}

/// Encodes secrets one-way and verifies presented secrets against them.
///
/// `verify` is a pure predicate: a mismatch, and a stored hash the matcher
/// cannot parse, are both plain `false`.
pub trait SecretMatcher: Send + Sync {
    /// Encode a raw secret for storage.
    fn encode(&self, raw_secret: &str) -> Result<SecretHash, MatcherError>;

    /// Verify a presented secret against a stored hash.
    fn verify(&self, presented_secret: &str, stored: &SecretHash) -> bool;

    /// Whether `stored` should be re-encoded with the current parameters.
    fn needs_rehash(&self, _stored: &SecretHash) -> bool {
        false
    }
}

impl<M> SecretMatcher for Arc<M>
where
    M: SecretMatcher + ?Sized,
{
    fn encode(&self, raw_secret: &str) -> Result<SecretHash, MatcherError> {
        (**self).encode(raw_secret)
    }

    fn verify(&self, presented_secret: &str, stored: &SecretHash) -> bool {
        (**self).verify(presented_secret, stored)
    }

    fn needs_rehash(&self, stored: &SecretHash) -> bool {
        (**self).needs_rehash(stored)
    }
}

/// Argon2id matcher storing PHC strings.
///
/// Verification recomputes the hash with the parameters and salt embedded in
/// the stored PHC string, then compares outputs in constant time. Stored
/// hashes produced under older parameters keep verifying; `needs_rehash`
/// reports them.
///
/// A stored hash that cannot be parsed still costs one Argon2 computation at
/// the current parameters before `verify` returns `false`.
#[derive(Clone)]
pub struct Argon2SecretMatcher {
    argon2: Argon2<'static>,
    config: MatcherConfig,
    // PHC string verified against when the stored hash is unparseable.
    filler: String,
}

impl Argon2SecretMatcher {
    pub fn new(config: MatcherConfig) -> Result<Self, MatcherError> {
        let params = config
            .to_params()
            .map_err(|e| MatcherError::InvalidParams(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let filler = argon2
            .hash_password(FILLER_SECRET.as_bytes(), &salt)
            .map_err(|e| MatcherError::Hash(e.to_string()))?
            .to_string();

        Ok(Self {
            argon2,
            config,
            filler,
        })
    }

    pub fn config(&self) -> MatcherConfig {
        self.config
    }
}

impl core::fmt::Debug for Argon2SecretMatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Argon2SecretMatcher")
            .field("config", &self.config)
            .finish()
    }
}

impl SecretMatcher for Argon2SecretMatcher {
    fn encode(&self, raw_secret: &str) -> Result<SecretHash, MatcherError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(raw_secret.as_bytes(), &salt)
            .map_err(|e| MatcherError::Hash(e.to_string()))?;

        Ok(SecretHash::from_bytes(hash.to_string().into_bytes()))
    }

    fn verify(&self, presented_secret: &str, stored: &SecretHash) -> bool {
        let Some(parsed) = parse_phc(stored) else {
            if let Ok(filler) = PasswordHash::new(&self.filler) {
                let _ = std::hint::black_box(
                    self.argon2
                        .verify_password(presented_secret.as_bytes(), &filler),
                );
            }
            return false;
        };

        self.argon2
            .verify_password(presented_secret.as_bytes(), &parsed)
            .is_ok()
    }

    fn needs_rehash(&self, stored: &SecretHash) -> bool {
        let Some(parsed) = parse_phc(stored) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(params) => {
                params.m_cost() < self.config.memory_kib
                    || params.t_cost() < self.config.iterations
                    || params.p_cost() < self.config.parallelism
            }
            Err(_) => true,
        }
    }
}

fn parse_phc(stored: &SecretHash) -> Option<PasswordHash<'_>> {
    let encoded = std::str::from_utf8(stored.as_bytes()).ok()?;
    PasswordHash::new(encoded).ok()
}

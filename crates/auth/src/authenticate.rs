//! Username + secret authentication.
//!
//! [`Authenticator`] orchestrates a credential store lookup and a secret
//! matcher verification and returns a typed [`AuthenticationResult`].
//!
//! - No retries (a credential mismatch is not transient)
//! - No partial results
//! - No shared mutable state: safe for unbounded concurrent calls

use thiserror::Error;
use tracing::{debug, info, warn};

use keyward_core::id::MAX_PRINCIPAL_ID_LEN;
use keyward_core::PrincipalId;

use crate::credential::SecretHash;
use crate::matcher::{MatcherError, SecretMatcher};
use crate::permissions::{Permission, PermissionSet};
use crate::store::{CredentialStore, StoreError};

/// The one reason ever reported for a rejected attempt.
///
/// Unknown principals and wrong secrets are indistinguishable to callers.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

// Verified against when the principal does not exist, so that both
// rejection paths pay for one full hash computation.
const DECOY_SECRET: &str = "keyward-decoy-secret";

/// Identity established by a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub principal_id: PrincipalId,
    pub granted_permissions: PermissionSet,
}

impl AuthenticatedPrincipal {
    pub fn has_permission(&self, required: &Permission) -> bool {
        self.granted_permissions.contains(required)
            || self.granted_permissions.iter().any(Permission::is_wildcard)
    }
}

/// Outcome of one authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationResult {
    Authenticated(AuthenticatedPrincipal),
    Rejected { reason: &'static str },
}

impl AuthenticationResult {
    fn rejected() -> Self {
        Self::Rejected {
            reason: INVALID_CREDENTIALS,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&AuthenticatedPrincipal> {
        match self {
            Self::Authenticated(p) => Some(p),
            Self::Rejected { .. } => None,
        }
    }

    pub fn into_principal(self) -> Option<AuthenticatedPrincipal> {
        match self {
            Self::Authenticated(p) => Some(p),
            Self::Rejected { .. } => None,
        }
    }
}

/// Infrastructure failure while authenticating.
///
/// Never used for a denial: a denial is `Ok(AuthenticationResult::Rejected)`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Unavailable(#[from] StoreError),
}

/// Why an attempt was rejected. Logged at debug level only.
#[derive(Debug, Clone, Copy)]
enum RejectCause {
    MalformedPrincipal,
    UnknownPrincipal,
    SecretMismatch,
}

/// Verifies principal + secret pairs against a credential store.
///
/// Collaborators are passed in explicitly; there is no global registry.
///
/// # Timing
///
/// An unknown or malformed principal is verified against a decoy hash
/// encoded at construction, i.e. with the matcher's *current* parameters.
/// Stored hashes keep the parameters they were encoded with. After the
/// parameters change, a wrong secret for a principal with an older hash no
/// longer costs the same as a rejection for an unknown principal, and the
/// difference can reveal which principals exist. Re-encode such hashes on the next
/// successful login: when [`SecretMatcher::needs_rehash`] reports the stored
/// hash, rotate it with the secret that was just accepted (for example via
/// the in-memory store's `rotate_secret`).
///
/// # Example
/// ```ignore
/// let authenticator = Authenticator::new(store, Argon2SecretMatcher::new(config)?)?;
///
/// match authenticator.authenticate("alice", "correct-pw")? {
///     AuthenticationResult::Authenticated(principal) => { /* ... */ }
///     AuthenticationResult::Rejected { reason } => { /* ... */ }
/// }
/// ```
pub struct Authenticator<S, M> {
    store: S,
    matcher: M,
    decoy: SecretHash,
}

impl<S, M> Authenticator<S, M>
where
    S: CredentialStore,
    M: SecretMatcher,
{
    /// Build an authenticator.
    ///
    /// Fails only if the matcher cannot encode the internal decoy secret.
    pub fn new(store: S, matcher: M) -> Result<Self, MatcherError> {
        let decoy = matcher.encode(DECOY_SECRET)?;
        Ok(Self {
            store,
            matcher,
            decoy,
        })
    }

    /// Authenticate a principal with a presented secret.
    ///
    /// Returns `Err` only when the credential store is unavailable.
    pub fn authenticate(
        &self,
        principal_id: &str,
        presented_secret: &str,
    ) -> Result<AuthenticationResult, AuthError> {
        let Ok(principal_id) = PrincipalId::parse(principal_id) else {
            self.burn_decoy(presented_secret);
            return Ok(self.reject(principal_id, RejectCause::MalformedPrincipal));
        };

        let record = match self.store.lookup(&principal_id) {
            Ok(record) => record,
            Err(err) => {
                warn!(principal = %principal_id, error = %err, "credential lookup failed");
                return Err(AuthError::Unavailable(err));
            }
        };

        let Some(record) = record else {
            self.burn_decoy(presented_secret);
            return Ok(self.reject(principal_id.as_str(), RejectCause::UnknownPrincipal));
        };

        if !self.matcher.verify(presented_secret, &record.secret_hash) {
            return Ok(self.reject(principal_id.as_str(), RejectCause::SecretMismatch));
        }

        if self.matcher.needs_rehash(&record.secret_hash) {
            debug!(principal = %principal_id, "stored secret uses outdated parameters");
        }

        info!(principal = %principal_id, "authentication accepted");
        Ok(AuthenticationResult::Authenticated(AuthenticatedPrincipal {
            principal_id,
            granted_permissions: record.granted_permissions,
        }))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    fn burn_decoy(&self, presented_secret: &str) {
        std::hint::black_box(self.matcher.verify(presented_secret, &self.decoy));
    }

    fn reject(&self, principal: &str, cause: RejectCause) -> AuthenticationResult {
        let principal = clip_for_log(principal);
        warn!(principal = %principal.escape_debug(), "authentication rejected");
        debug!(principal = %principal.escape_debug(), cause = ?cause, "rejection cause");
        AuthenticationResult::rejected()
    }
}

/// Longest prefix of `raw` that fits a valid principal id, cut on a char
/// boundary. Rejected input is caller-controlled and otherwise unbounded.
fn clip_for_log(raw: &str) -> &str {
    if raw.len() <= MAX_PRINCIPAL_ID_LEN {
        return raw;
    }
    let mut end = MAX_PRINCIPAL_ID_LEN;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}

impl<S, M> core::fmt::Debug for Authenticator<S, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::MatcherConfig;
    use crate::credential::CredentialRecord;
    use crate::matcher::Argon2SecretMatcher;
    use crate::permissions::permission_set;
    use proptest::prelude::*;

    #[derive(Default)]
    struct MapStore {
        records: HashMap<String, CredentialRecord>,
        lookups: AtomicUsize,
    }

    impl MapStore {
        fn with(
            mut self,
            id: &str,
            secret: &str,
            perms: &[&'static str],
            matcher: &impl SecretMatcher,
        ) -> Self {
            let principal_id = PrincipalId::parse(id).unwrap();
            let record = CredentialRecord::new(
                principal_id,
                matcher.encode(secret).unwrap(),
                permission_set(perms.iter().copied()),
            );
            self.records.insert(id.to_string(), record);
            self
        }
    }

    impl CredentialStore for MapStore {
        fn lookup(
            &self,
            principal_id: &PrincipalId,
        ) -> Result<Option<CredentialRecord>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.get(principal_id.as_str()).cloned())
        }
    }

    struct DownStore;

    impl CredentialStore for DownStore {
        fn lookup(&self, _: &PrincipalId) -> Result<Option<CredentialRecord>, StoreError> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    /// Counts verifications so tests can assert which code path ran.
    struct CountingMatcher {
        inner: Argon2SecretMatcher,
        verifications: AtomicUsize,
    }

    impl CountingMatcher {
        fn new() -> Self {
            Self {
                inner: fast_matcher(),
                verifications: AtomicUsize::new(0),
            }
        }
    }

    impl SecretMatcher for CountingMatcher {
        fn encode(&self, raw_secret: &str) -> Result<SecretHash, MatcherError> {
            self.inner.encode(raw_secret)
        }

        fn verify(&self, presented_secret: &str, stored: &SecretHash) -> bool {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(presented_secret, stored)
        }
    }

    fn fast_matcher() -> Argon2SecretMatcher {
        Argon2SecretMatcher::new(MatcherConfig::insecure_fast()).unwrap()
    }

    fn alice_authenticator() -> Authenticator<MapStore, Argon2SecretMatcher> {
        let matcher = fast_matcher();
        let store = MapStore::default().with(
            "alice",
            "correct-pw",
            &["products.read", "products.write"],
            &matcher,
        );
        Authenticator::new(store, matcher).unwrap()
    }

    #[test]
    fn correct_secret_is_authenticated_with_stored_permissions() {
        let auth = alice_authenticator();

        let result = auth.authenticate("alice", "correct-pw").unwrap();
        let principal = result.principal().expect("expected Authenticated");

        assert_eq!(principal.principal_id.as_str(), "alice");
        assert_eq!(
            principal.granted_permissions,
            permission_set(["products.read", "products.write"])
        );
    }

    #[test]
    fn wrong_secret_is_rejected_generically() {
        let auth = alice_authenticator();

        let result = auth.authenticate("alice", "wrong").unwrap();
        assert_eq!(
            result,
            AuthenticationResult::Rejected {
                reason: INVALID_CREDENTIALS
            }
        );
    }

    #[test]
    fn unknown_principal_matches_wrong_secret_outcome() {
        let auth = alice_authenticator();

        let wrong_secret = auth.authenticate("alice", "wrong").unwrap();
        let unknown = auth.authenticate("bob", "anything").unwrap();
        assert_eq!(wrong_secret, unknown);
    }

    #[test]
    fn malformed_principal_is_rejected_without_store_call() {
        let auth = alice_authenticator();

        let result = auth.authenticate("   ", "anything").unwrap();
        assert_eq!(result, AuthenticationResult::rejected());
        assert_eq!(auth.store().lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn every_rejection_path_runs_one_verification() {
        let matcher = CountingMatcher::new();
        let store = MapStore::default().with("alice", "correct-pw", &[], &matcher);
        let auth = Authenticator::new(store, matcher).unwrap();

        auth.authenticate("alice", "wrong").unwrap();
        assert_eq!(auth.matcher().verifications.load(Ordering::SeqCst), 1);

        auth.authenticate("bob", "anything").unwrap();
        assert_eq!(auth.matcher().verifications.load(Ordering::SeqCst), 2);

        auth.authenticate("", "anything").unwrap();
        assert_eq!(auth.matcher().verifications.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn decoy_secret_does_not_authenticate_unknown_principals() {
        let auth = alice_authenticator();
        let result = auth.authenticate("mallory", DECOY_SECRET).unwrap();
        assert!(!result.is_authenticated());
    }

    #[test]
    fn store_outage_is_not_a_rejection() {
        let auth = Authenticator::new(DownStore, fast_matcher()).unwrap();

        let err = auth.authenticate("alice", "correct-pw").unwrap_err();
        assert!(matches!(err, AuthError::Unavailable(StoreError::Unavailable(_))));
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let auth = alice_authenticator();

        let first = auth.authenticate("alice", "correct-pw").unwrap();
        let second = auth.authenticate("alice", "correct-pw").unwrap();
        assert_eq!(first, second);

        let first = auth.authenticate("alice", "nope").unwrap();
        let second = auth.authenticate("alice", "nope").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn wildcard_grants_any_permission() {
        let principal = AuthenticatedPrincipal {
            principal_id: PrincipalId::parse("root").unwrap(),
            granted_permissions: permission_set(["*"]),
        };
        assert!(principal.has_permission(&Permission::new("anything.at.all")));
    }

    #[test]
    fn oversized_principal_is_clipped_before_logging() {
        let short = "alice";
        assert_eq!(clip_for_log(short), short);

        let long = "x".repeat(10 * MAX_PRINCIPAL_ID_LEN);
        assert_eq!(clip_for_log(&long).len(), MAX_PRINCIPAL_ID_LEN);

        // 255 ASCII bytes then a 3-byte char straddling the limit.
        let straddling = format!("{}\u{20ac}tail", "a".repeat(MAX_PRINCIPAL_ID_LEN - 1));
        let clipped = clip_for_log(&straddling);
        assert_eq!(clipped.len(), MAX_PRINCIPAL_ID_LEN - 1);
        assert!(straddling.starts_with(clipped));

        let multibyte = "\u{00e9}".repeat(MAX_PRINCIPAL_ID_LEN);
        let clipped = clip_for_log(&multibyte);
        assert_eq!(clipped.len(), MAX_PRINCIPAL_ID_LEN);
        assert!(clipped.chars().all(|c| c == '\u{00e9}'));
    }

    #[test]
    fn oversized_principal_is_rejected_without_store_call() {
        let auth = alice_authenticator();
        let long = "a".repeat(1 << 20);

        let result = auth.authenticate(&long, "anything").unwrap();
        assert_eq!(result, AuthenticationResult::rejected());
        assert_eq!(auth.store().lookups.load(Ordering::SeqCst), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 32,
            ..ProptestConfig::default()
        })]

        /// Property: any principal absent from the store is rejected with the
        /// same reason as a wrong secret for an existing principal.
        #[test]
        fn absent_principals_are_indistinguishable(
            id in "[a-z]{1,16}",
            secret in ".{0,32}",
        ) {
            prop_assume!(id != "alice");
            let auth = alice_authenticator();

            let unknown = auth.authenticate(&id, &secret).unwrap();
            let mismatch = auth.authenticate("alice", "definitely-wrong").unwrap();
            prop_assert_eq!(unknown, mismatch);
        }
    }
}

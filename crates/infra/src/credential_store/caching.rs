use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use keyward_auth::{CredentialRecord, CredentialStore, StoreError};
use keyward_core::PrincipalId;

use crate::config::CacheConfig;

#[derive(Debug, Clone)]
struct CachedRecord {
    record: CredentialRecord,
    cached_at: Instant,
}

/// Caching wrapper for any [`CredentialStore`].
///
/// Caches found records for a configurable duration to reduce backing-store
/// round trips. Misses and outages are never cached, so a principal created
/// after a failed lookup is visible immediately.
///
/// Writes to the backing store are not observed. Until an entry expires or
/// is invalidated:
/// - a rotated secret keeps verifying;
/// - a removed principal keeps being returned, so it keeps authenticating.
///
/// Callers that rotate or remove principals through this process should call
/// [`invalidate`](Self::invalidate). A lookup that was already reading from
/// the backing store when `invalidate` or `clear` ran does not re-populate
/// the cache with what it read.
#[derive(Debug)]
pub struct CachingCredentialStore<S> {
    inner: S,
    cache: RwLock<HashMap<PrincipalId, CachedRecord>>,
    // Bumped under the cache write lock by `invalidate` and `clear`.
    generation: AtomicU64,
    ttl: Duration,
}

impl<S> CachingCredentialStore<S>
where
    S: CredentialStore,
{
    /// Create a new caching store with the default TTL (5 minutes).
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, CacheConfig::default())
    }

    pub fn with_config(inner: S, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            ttl: config.ttl(),
        }
    }

    /// Set the cache TTL (time-to-live).
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            self.generation.fetch_add(1, Ordering::AcqRel);
            cache.clear();
        }
    }

    /// Drop the cached entry of one principal.
    pub fn invalidate(&self, principal_id: &PrincipalId) {
        if let Ok(mut cache) = self.cache.write() {
            self.generation.fetch_add(1, Ordering::AcqRel);
            cache.remove(principal_id);
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn is_fresh(&self, entry: &CachedRecord) -> bool {
        entry.cached_at.elapsed() < self.ttl
    }
}

impl<S> CredentialStore for CachingCredentialStore<S>
where
    S: CredentialStore,
{
    fn lookup(&self, principal_id: &PrincipalId) -> Result<Option<CredentialRecord>, StoreError> {
        // A poisoned cache degrades to pass-through.
        if let Ok(cache) = self.cache.read() {
            if let Some(entry) = cache.get(principal_id) {
                if self.is_fresh(entry) {
                    return Ok(Some(entry.record.clone()));
                }
            }
        }

        let generation = self.generation.load(Ordering::Acquire);
        let found = self.inner.lookup(principal_id)?;

        if let Some(record) = &found {
            if let Ok(mut cache) = self.cache.write() {
                if self.generation.load(Ordering::Acquire) != generation {
                    debug!(principal = %principal_id, "invalidated during lookup, not caching");
                    return Ok(found);
                }
                debug!(principal = %principal_id, "caching credential record");
                cache.insert(
                    principal_id.clone(),
                    CachedRecord {
                        record: record.clone(),
                        cached_at: Instant::now(),
                    },
                );
            }
        }

        Ok(found)
    }
}

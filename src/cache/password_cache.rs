//! Sliding-expiry password cache
//!
//! Keeps the last password entered so consecutive commands within the
//! expiry window don't prompt again. The window is measured from the most
//! recent use: a successful cached load calls [`PasswordCache::touch`].

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::error::{CmdbError, CmdbResult};

use super::entry::CacheEntry;
use super::store::CacheStore;

/// Minutes a cached password stays valid after its last use
pub const CACHE_EXPIRY_MINUTES: i64 = 10;

/// Password cache over a [`CacheStore`]
pub struct PasswordCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: CacheStore> PasswordCache<S> {
    /// Create a cache with the standard expiry window
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, Duration::minutes(CACHE_EXPIRY_MINUTES))
    }

    /// Create a cache with a custom expiry window
    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Get the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the cached entry without refreshing it
    ///
    /// Fails with [`CmdbError::CacheNotFound`] if nothing is cached, and
    /// with [`CmdbError::CacheExpired`] if the entry is older than the
    /// window, in which case the record is deleted.
    pub fn read(&self) -> CmdbResult<CacheEntry> {
        let record = self.store.read()?.ok_or(CmdbError::CacheNotFound)?;
        let entry = CacheEntry::from_json(&record)?;

        let age = entry.age(now());
        if age > self.ttl.num_seconds() {
            debug!(age, "password cache expired");
            if let Err(e) = self.store.delete() {
                warn!(error = %e, "failed to remove expired password cache");
            }
            return Err(CmdbError::CacheExpired);
        }

        Ok(entry)
    }

    /// Slide the expiry window forward
    ///
    /// Best effort: a missing record or a write failure is ignored.
    pub fn touch(&self) {
        if let Err(e) = self.try_touch() {
            debug!(error = %e, "password cache refresh skipped");
        }
    }

    fn try_touch(&self) -> CmdbResult<()> {
        let Some(record) = self.store.read()? else {
            return Ok(());
        };
        let mut entry = CacheEntry::from_json(&record)?;
        entry.last_access = now();
        self.store.replace(&entry.to_json()?)
    }

    /// Cache a password, replacing any existing entry
    pub fn save(&self, password: &str) -> CmdbResult<()> {
        let entry = CacheEntry::new(password, now());
        self.store.replace(&entry.to_json()?)
    }

    /// Forget the cached password
    pub fn clear(&self) -> CmdbResult<()> {
        self.store.delete()
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

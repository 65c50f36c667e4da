//! Cache Store Module
//!
//! The shared key-value map guarded by a single reader-writer lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::warn;

use crate::cache::{CacheEntry, CacheStats, StatsSnapshot};

// == Cache ==
/// Thread-safe in-memory cache with lazy TTL expiration.
///
/// `set` and `clean_expired` take the write lock; `get` takes the read lock,
/// so lookups run in parallel with each other but never with a mutation.
/// Expired entries stay in the map until a sweep removes them, and are
/// invisible to `get` in the meantime.
#[derive(Debug, Default)]
pub struct Cache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: CacheStats,
}

impl Cache {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with room for `capacity` entries before
    /// reallocating. The cache is never bounded by this value.
    ///
    /// If the reservation cannot be made the cache starts unsized and grows
    /// on demand instead.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut entries = HashMap::new();
        if let Err(err) = entries.try_reserve(capacity) {
            warn!(capacity, %err, "Cannot pre-size cache, starting empty");
        }

        Self {
            entries: RwLock::new(entries),
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    ///
    /// The expiry is computed once the write lock is held, so time spent
    /// waiting for the lock does not shorten the entry's lifetime.
    /// A zero TTL stores an entry that is already expired.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Bytes>, ttl: Duration) {
        self.set_with_clock(key.into(), value.into(), ttl, Instant::now);
    }

    fn set_with_clock(
        &self,
        key: String,
        value: Bytes,
        ttl: Duration,
        now: impl FnOnce() -> Instant,
    ) {
        {
            let mut entries = self.entries.write();
            entries.insert(key, CacheEntry::new(value, ttl, now()));
        }
        self.stats.record_set();
    }

    #[cfg(test)]
    pub(crate) fn set_at(&self, key: String, value: Bytes, ttl: Duration, now: Instant) {
        self.set_with_clock(key, value, ttl, move || now);
    }

    // == Get ==
    /// Returns the value for `key` if it is present and not yet expired.
    ///
    /// Expiry is checked against the time at which the read lock was granted.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.get_with_clock(key, Instant::now)
    }

    fn get_with_clock(&self, key: &str, now: impl FnOnce() -> Instant) -> Option<Bytes> {
        let value = {
            let entries = self.entries.read();
            let now = now();
            entries
                .get(key)
                .filter(|entry| !entry.is_expired_at(now))
                .map(CacheEntry::value)
        };

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    #[cfg(test)]
    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<Bytes> {
        self.get_with_clock(key, move || now)
    }

    /// Returns true if `key` currently maps to a live entry.
    ///
    /// Unlike `get`, this does not count towards hits or misses.
    pub fn contains_live(&self, key: &str) -> bool {
        let entries = self.entries.read();
        let now = Instant::now();
        entries.get(key).is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Returns how long `key` stays live, or None if it is absent or expired.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read();
        let now = Instant::now();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.time_remaining_at(now))
    }

    // == Clean Expired ==
    /// Removes every entry that has expired.
    ///
    /// Each entry is checked and removed under the same write lock, so an entry
    /// re-set with a fresh TTL is never dropped on a stale observation.
    /// Returns the number of entries removed.
    pub fn clean_expired(&self) -> usize {
        self.clean_expired_with_clock(Instant::now)
    }

    fn clean_expired_with_clock(&self, now: impl FnOnce() -> Instant) -> usize {
        let removed = {
            let mut entries = self.entries.write();
            let now = now();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };

        self.stats.record_swept(removed);
        removed
    }

    #[cfg(test)]
    pub(crate) fn clean_expired_at(&self, now: Instant) -> usize {
        self.clean_expired_with_clock(move || now)
    }

    // == Length ==
    /// Returns the physical number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.len())
    }
}

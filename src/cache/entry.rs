//! Cache Entry Module
//!
//! Defines the immutable value/expiry pair stored per key.

use std::time::{Duration, Instant};

use bytes::Bytes;

/// Fallback horizon for TTLs too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 100);

// == Cache Entry ==
/// A single cache entry: the stored bytes and the instant they stop being valid.
///
/// Entries are never mutated once built; overwriting a key installs a new entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: Bytes,
    expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    ///
    /// A TTL that would overflow `Instant` is clamped to a horizon a century out.
    pub fn new(value: Bytes, ttl: Duration, now: Instant) -> Self {
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);

        Self { value, expires_at }
    }

    /// Returns a shared, immutable view of the stored bytes.
    pub fn value(&self) -> Bytes {
        self.value.clone()
    }

    /// Returns the instant from which the entry counts as expired.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so it is
    /// live only while the check happens strictly before its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Returns the remaining lifetime at `now`, zero once expired.
    pub fn time_remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a plain `HashMap` model on a
//! simulated clock, so expiry boundaries are exact rather than sleep-based.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::cache::Cache;

// == Strategies ==
/// Keys drawn from a small alphabet so operations collide on the same key.
/// The empty key is included.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{0,2}"
}

/// Arbitrary payloads, the empty one included
fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8>, ttl_ms: u64 },
    Get { key: String },
    Advance { ms: u64 },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy(), 0u64..50)
            .prop_map(|(key, value, ttl_ms)| CacheOp::Set { key, value, ttl_ms }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => (0u64..30).prop_map(|ms| CacheOp::Advance { ms }),
        1 => Just(CacheOp::Sweep),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every lookup agrees with a model map holding (value, expiry) per key:
    // values are visible strictly before expiry, only the latest set counts,
    // and a set on one key never disturbs another.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let cache = Cache::new();
        let mut model: HashMap<String, (Bytes, Instant)> = HashMap::new();
        let mut now = Instant::now();

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl_ms } => {
                    let ttl = Duration::from_millis(ttl_ms);
                    let value = Bytes::from(value);
                    cache.set_at(key.clone(), value.clone(), ttl, now);
                    model.insert(key, (value, now + ttl));
                }
                CacheOp::Get { key } => {
                    let expected = model
                        .get(&key)
                        .filter(|(_, expires_at)| now < *expires_at)
                        .map(|(value, _)| value.clone());
                    prop_assert_eq!(cache.get_at(&key, now), expected, "key {:?}", key);
                }
                CacheOp::Advance { ms } => {
                    now += Duration::from_millis(ms);
                }
                CacheOp::Sweep => {
                    let before = model.len();
                    model.retain(|_, (_, expires_at)| now < *expires_at);
                    prop_assert_eq!(cache.clean_expired_at(now), before - model.len());
                }
            }
            prop_assert_eq!(cache.len(), model.len());
        }
    }

    // A sweep never changes what `get` reports, it only reclaims entries.
    #[test]
    fn prop_sweep_is_invisible_to_get(
        entries in prop::collection::vec((key_strategy(), value_strategy(), 0u64..50), 1..30),
        elapsed_ms in 0u64..60
    ) {
        let cache = Cache::new();
        let t0 = Instant::now();
        for (key, value, ttl_ms) in &entries {
            cache.set_at(key.clone(), Bytes::from(value.clone()), Duration::from_millis(*ttl_ms), t0);
        }

        let now = t0 + Duration::from_millis(elapsed_ms);
        let before: Vec<_> = entries.iter().map(|(k, _, _)| cache.get_at(k, now)).collect();
        cache.clean_expired_at(now);
        let after: Vec<_> = entries.iter().map(|(k, _, _)| cache.get_at(k, now)).collect();

        prop_assert_eq!(before, after);
    }

    // A stored payload is returned byte-for-byte until its expiry instant.
    #[test]
    fn prop_expiry_boundary(value in value_strategy(), ttl_ms in 1u64..10_000) {
        let cache = Cache::new();
        let t0 = Instant::now();
        let ttl = Duration::from_millis(ttl_ms);

        cache.set_at("k".to_string(), Bytes::from(value.clone()), ttl, t0);

        let just_before = t0 + ttl - Duration::from_nanos(1);
        prop_assert_eq!(cache.get_at("k", just_before), Some(Bytes::from(value)));
        prop_assert_eq!(cache.get_at("k", t0 + ttl), None);
    }
}

// Fewer cases: each one spins up real threads
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Sweeps racing a writer that keeps refreshing a long-lived key never
    // remove it, regardless of interleaving.
    #[test]
    fn prop_concurrent_sweep_spares_fresh_sets(
        keys in prop::collection::hash_set("[a-z]{1,6}", 1..16),
        rounds in 1usize..50
    ) {
        let cache = Arc::new(Cache::new());
        let keys: Vec<String> = keys.into_iter().collect();
        for key in &keys {
            cache.set(key.clone(), Bytes::from_static(b"stale"), Duration::ZERO);
        }

        std::thread::scope(|s| {
            let sweeper = Arc::clone(&cache);
            s.spawn(move || {
                for _ in 0..rounds {
                    sweeper.clean_expired();
                }
            });

            let writer = Arc::clone(&cache);
            let write_keys = keys.clone();
            s.spawn(move || {
                for _ in 0..rounds {
                    for key in &write_keys {
                        writer.set(key.clone(), Bytes::from_static(b"fresh"), Duration::from_secs(3600));
                    }
                }
            });
        });

        cache.clean_expired();
        for key in &keys {
            prop_assert_eq!(cache.get(key), Some(Bytes::from_static(b"fresh")));
        }
    }
}

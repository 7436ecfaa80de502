//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check size accounting, the size bound and delete
//! idempotence over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::{BoundedExpiringCache, RemovalCause};

// == Strategies ==
/// Small key space so sequences revisit keys and exercise overwrites
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..48)
}

/// Every key `key_strategy` can produce
fn all_keys() -> Vec<String> {
    let letters = ["a", "b", "c", "d", "e", "f"];
    let mut keys: Vec<String> = letters.iter().map(|l| l.to_string()).collect();
    for first in letters {
        for second in letters {
            keys.push(format!("{first}{second}"));
        }
    }
    keys
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        1 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

/// Mirrors the cache contents through listener callbacks so the
/// expected byte total can be recomputed independently.
fn shadowed_cache(
    max_size_bytes: Option<u64>,
) -> (BoundedExpiringCache, Arc<Mutex<HashMap<String, usize>>>) {
    let shadow: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));
    let sink = Arc::clone(&shadow);

    let mut builder = BoundedExpiringCache::builder().eviction_listener(move |key, _| {
        sink.lock().unwrap().remove(key);
        Ok(())
    });
    if let Some(max) = max_size_bytes {
        builder = builder.max_size_bytes(max);
    }

    (builder.build().unwrap(), shadow)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Bytes in use always equal the sum of live value lengths
    #[test]
    fn prop_size_accounting(
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
        bound in prop::option::of(1u64..128),
    ) {
        let (cache, shadow) = shadowed_cache(bound);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let len = value.len();
                    cache.set(key.clone(), value);
                    shadow.lock().unwrap().insert(key, len);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key);
                    let expected = shadow.lock().unwrap().get(&key).copied();
                    prop_assert_eq!(got.map(|v| v.len()), expected);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                }
            }

            let stats = cache.stats();
            let shadow = shadow.lock().unwrap();
            let expected_bytes: u64 = shadow.values().map(|len| *len as u64).sum();
            prop_assert_eq!(stats.bytes, expected_bytes);
            prop_assert_eq!(stats.items as usize, shadow.len());
        }
    }

    // After every write the bound holds, or the just-written value is alone
    #[test]
    fn prop_size_bound_enforced(
        writes in prop::collection::vec((key_strategy(), value_strategy()), 1..80),
        bound in 1u64..96,
    ) {
        let cache = BoundedExpiringCache::new(Some(bound), None).unwrap();

        for (key, value) in writes {
            cache.set(key.clone(), value);
            let stats = cache.stats();
            prop_assert!(
                stats.bytes <= bound || (stats.items == 1 && cache.contains_key(&key)),
                "bytes {} exceed bound {} with {} items",
                stats.bytes,
                bound,
                stats.items
            );
            prop_assert!(cache.contains_key(&key), "write of '{}' was not admitted", key);
        }
    }

    // The removal counter never decreases and counts each listener event
    #[test]
    fn prop_expired_counter_matches_notifications(
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
        bound in prop::option::of(1u64..64),
    ) {
        let notified = Arc::new(Mutex::new(0u64));
        let sink = Arc::clone(&notified);
        let mut builder = BoundedExpiringCache::builder().eviction_listener(move |_, _| {
            *sink.lock().unwrap() += 1;
            Ok(())
        });
        if let Some(max) = bound {
            builder = builder.max_size_bytes(max);
        }
        let cache = builder.build().unwrap();

        let mut last_expired = 0;
        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => { let _ = cache.get(&key); }
                CacheOp::Delete { key } => { cache.delete(&key); }
            }

            let expired = cache.stats().expired;
            prop_assert!(expired >= last_expired);
            prop_assert_eq!(expired, *notified.lock().unwrap());
            last_expired = expired;
        }
    }

    // A second delete of the same key changes nothing
    #[test]
    fn prop_delete_idempotent(
        key in key_strategy(),
        value in value_strategy(),
    ) {
        let cache = BoundedExpiringCache::new(None, None).unwrap();
        cache.set(key.clone(), value);

        prop_assert!(cache.delete(&key));
        let once = cache.stats();
        prop_assert!(!cache.delete(&key));
        prop_assert_eq!(cache.stats(), once);
        prop_assert_eq!(once.expired, 1);
        prop_assert_eq!(once.bytes, 0);
    }

    // The last write to a key wins
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy(),
    ) {
        let cache = BoundedExpiringCache::new(None, None).unwrap();

        cache.set(key.clone(), value1);
        cache.set(key.clone(), value2.clone());

        prop_assert_eq!(cache.stats().bytes, value2.len() as u64);
        prop_assert_eq!(cache.get(&key), Some(value2));
        prop_assert_eq!(cache.len(), 1);
        prop_assert_eq!(cache.stats().expired, 0);
    }
}

// Concurrent access through cloned handles on a multi-thread runtime
proptest! {
    #![proptest_config(ProptestConfig::with_cases(25))]

    #[test]
    fn prop_concurrent_operations_keep_invariants(
        ops in prop::collection::vec(cache_op_strategy(), 10..120),
        bound in 16u64..128,
    ) {
        let cache = BoundedExpiringCache::new(Some(bound), Some(Duration::from_secs(60))).unwrap();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .build()
            .unwrap();

        runtime.block_on(async {
            let handles: Vec<_> = ops
                .chunks(ops.len().div_ceil(4))
                .map(|batch| {
                    let cache = cache.clone();
                    let batch = batch.to_vec();
                    tokio::spawn(async move {
                        for op in batch {
                            match op {
                                CacheOp::Set { key, value } => cache.set(key, value),
                                CacheOp::Get { key } => { let _ = cache.get(&key); }
                                CacheOp::Delete { key } => { cache.delete(&key); }
                            }
                            let stats = cache.stats();
                            assert!(stats.bytes <= bound || stats.items <= 1, "{stats:?}");
                            tokio::task::yield_now().await;
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.await.expect("cache operation should not panic");
            }
        });

        let stats = cache.stats();
        let (live_items, live_bytes) = all_keys()
            .iter()
            .filter_map(|key| cache.get(key))
            .fold((0u64, 0u64), |(items, bytes), value| (items + 1, bytes + value.len() as u64));

        prop_assert!(stats.bytes <= bound || stats.items == 1);
        prop_assert_eq!(stats.items, live_items);
        prop_assert_eq!(stats.bytes, live_bytes);
    }
}

// == Scenario Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_six_byte_values_under_ten_byte_bound() {
        let (cache, shadow) = shadowed_cache(Some(10));

        cache.set("a", vec![1u8; 6]);
        shadow.lock().unwrap().insert("a".to_string(), 6);
        cache.set("b", vec![2u8; 6]);
        shadow.lock().unwrap().insert("b".to_string(), 6);

        let stats = cache.stats();
        assert_eq!(stats.items, 1);
        assert_eq!(stats.expired, 1);
        assert!(stats.bytes <= 10);
        assert_eq!(shadow.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_listener_cause_for_each_trigger() {
        let causes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&causes);
        let cache = BoundedExpiringCache::builder()
            .max_size_bytes(4)
            .ttl(Duration::from_millis(20))
            .eviction_listener(move |_, cause| {
                sink.lock().unwrap().push(cause);
                Ok(())
            })
            .build()
            .unwrap();

        cache.set("a", vec![0u8; 4]);
        cache.set("b", vec![0u8; 4]);
        cache.delete("b");
        cache.set("c", vec![0u8; 1]);
        std::thread::sleep(Duration::from_millis(40));
        cache.purge_expired();

        assert_eq!(
            *causes.lock().unwrap(),
            vec![RemovalCause::Size, RemovalCause::Explicit, RemovalCause::Expired]
        );
    }
}

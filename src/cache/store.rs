//! Cache Store Module
//!
//! Unsynchronized cache state: the entry map, size accounting, and the one
//! removal routine shared by explicit deletes, size eviction and the sweep.
//! [`BoundedExpiringCache`](super::BoundedExpiringCache) wraps it in a lock.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};

// == Removal ==
/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    /// Caller issued a delete
    Explicit,
    /// Outlived the TTL and was swept
    Expired,
    /// Evicted to make room for a write under the size bound
    Size,
}

/// A key removed during an operation, pending listener notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub key: String,
    pub cause: RemovalCause,
}

// == Cache Store ==
/// Entry map with byte accounting and bounded-size eviction.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Read and removal counters
    stats: CacheStats,
    /// Sum of the value lengths of every live entry
    current_size: u64,
    /// Total size ceiling, None = unbounded
    max_size_bytes: Option<u64>,
    /// Maximum age since last touch, None = never expires
    ttl: Option<Duration>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store. Bounds are assumed already validated.
    pub fn new(max_size_bytes: Option<u64>, ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            current_size: 0,
            max_size_bytes,
            ttl,
        }
    }

    pub fn max_size_bytes(&self) -> Option<u64> {
        self.max_size_bytes
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    // == Get ==
    /// Returns a copy of the stored value and refreshes its timestamp.
    ///
    /// Entries that are logically expired but not yet swept are still
    /// returned; age-based removal only happens in [`purge_expired`].
    ///
    /// [`purge_expired`]: CacheStore::purge_expired
    pub fn get(&mut self, key: &str, now: Instant) -> Option<Vec<u8>> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch(now);
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, evicting other entries if the size bound
    /// would be exceeded.
    ///
    /// An overwritten value is replaced in place: its length leaves the
    /// accounting but it is not counted as a removal. Victims are taken in
    /// map iteration order, which is unspecified. The incoming value is
    /// never rejected, so a value larger than the bound ends up alone in the
    /// cache.
    pub fn set(&mut self, key: String, value: Vec<u8>, now: Instant, removed: &mut Vec<Removal>) {
        let incoming = value.len() as u64;

        if let Some(previous) = self.entries.remove(&key) {
            self.current_size -= previous.size();
        }

        if let Some(max) = self.max_size_bytes {
            while self.current_size.saturating_add(incoming) > max {
                let Some(victim) = self.entries.keys().next().cloned() else {
                    break;
                };
                self.remove(&victim, RemovalCause::Size, removed);
            }
        }

        self.current_size += incoming;
        self.entries.insert(key, CacheEntry::new(value, now));
    }

    // == Remove ==
    /// The single removal path. Returns false if the key was absent.
    ///
    /// Keeps the byte total in step with the map, bumps the removal
    /// counter, and queues the key for listener notification.
    pub fn remove(&mut self, key: &str, cause: RemovalCause, removed: &mut Vec<Removal>) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.current_size -= entry.size();
                self.stats.record_removal();
                removed.push(Removal {
                    key: key.to_string(),
                    cause,
                });
                true
            }
            None => false,
        }
    }

    // == Purge Expired ==
    /// Removes every entry whose age has reached the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant, removed: &mut Vec<Removal>) -> usize {
        if self.ttl.is_none() {
            return 0;
        }

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        expired_keys
            .iter()
            .filter(|key| self.remove(key, RemovalCause::Expired, removed))
            .count()
    }

    // == Stats ==
    /// Returns current occupancy and counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            bytes: self.current_size,
            items: self.entries.len() as u64,
            ..self.stats
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

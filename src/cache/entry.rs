//! Cache Entry Module
//!
//! Defines a single stored blob together with its last-touched timestamp.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored value and the moment it was last read or written.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Refreshed on every successful read and write
    pub last_touched: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry touched at `now`.
    pub fn new(value: Vec<u8>, now: Instant) -> Self {
        Self {
            value,
            last_touched: now,
        }
    }

    // == Size ==
    /// Number of bytes this entry contributes to the cache occupancy.
    pub fn size(&self) -> u64 {
        self.value.len() as u64
    }

    // == Touch ==
    pub fn touch(&mut self, now: Instant) {
        self.last_touched = now;
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is
    /// already expired. Without a TTL nothing ever expires by age.
    pub fn is_expired(&self, ttl: Option<Duration>, now: Instant) -> bool {
        match ttl {
            Some(ttl) => self.age(now) >= ttl,
            None => false,
        }
    }

    // == Age ==
    /// Time elapsed since the last touch.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_touched)
    }
}

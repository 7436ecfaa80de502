//! Cache Statistics Module
//!
//! Occupancy snapshot returned by the cache, plus read hit/miss counters.

use serde::Serialize;

// == Cache Stats ==
/// A consistent snapshot of cache occupancy and counters.
///
/// All fields are read inside one critical section, so `bytes` always
/// equals the sum of the value lengths of the `items` live entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total bytes held by live values
    pub bytes: u64,
    /// Number of live entries
    pub items: u64,
    /// Cumulative removals of any kind (explicit, age, size pressure)
    pub expired: u64,
    /// Reads that found their key
    pub hits: u64,
    /// Reads that did not
    pub misses: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Removal ==
    /// Counts one removal. The counter never decreases.
    pub fn record_removal(&mut self) {
        self.expired += 1;
    }
}

//! Bounded Expiring Cache
//!
//! Thread-safe handle over the cache store. Every operation runs inside one
//! mutex; eviction notifications are delivered after the lock is released.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use crate::cache::store::{CacheStore, Removal, RemovalCause};
use crate::cache::CacheStats;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, SweepHandle};

/// Callback invoked once for every entry that leaves the cache.
///
/// An `Err` is logged and otherwise ignored; the entry is already gone.
pub type EvictionListener = Arc<dyn Fn(&str, RemovalCause) -> anyhow::Result<()> + Send + Sync>;

// == Shared State ==
pub(crate) struct Shared {
    store: Mutex<CacheStore>,
    listener: Option<EvictionListener>,
    /// Set while a sweep task owns this cache
    sweeping: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CacheStore> {
        // Each store operation completes before releasing the guard, so a
        // panic elsewhere cannot leave the accounting half-updated.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, removed: Vec<Removal>) {
        let Some(listener) = &self.listener else {
            return;
        };

        for Removal { key, cause } in removed {
            if let Err(err) = listener(&key, cause) {
                warn!(key = %key, ?cause, error = %err, "Eviction listener failed");
            }
        }
    }

    pub(crate) fn purge_expired(&self) -> usize {
        let mut removed = Vec::new();
        let count = self.lock().purge_expired(Instant::now(), &mut removed);
        self.notify(removed);
        count
    }

    pub(crate) fn finish_sweep(&self) {
        self.sweeping.store(false, Ordering::Release);
    }
}

// == Bounded Expiring Cache ==
/// In-memory byte cache with an optional total-size bound and an optional
/// age limit.
///
/// Cloning is cheap and yields another handle to the same cache.
///
/// # Example
/// ```
/// use blobcache::cache::BoundedExpiringCache;
///
/// let cache = BoundedExpiringCache::new(Some(10), None).unwrap();
/// cache.set("a", vec![0u8; 6]);
/// cache.set("b", vec![0u8; 6]);
///
/// let stats = cache.stats();
/// assert_eq!(stats.items, 1);
/// assert_eq!(stats.expired, 1);
/// ```
#[derive(Clone)]
pub struct BoundedExpiringCache {
    shared: Arc<Shared>,
}

impl BoundedExpiringCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// `None` disables the corresponding limit. Zero values are rejected;
    /// an unbounded or non-expiring cache is spelled `None`.
    pub fn new(max_size_bytes: Option<u64>, ttl: Option<Duration>) -> Result<Self> {
        let mut builder = Self::builder();
        builder.max_size_bytes = max_size_bytes;
        builder.ttl = ttl;
        builder.build()
    }

    pub fn builder() -> CacheBuilder {
        CacheBuilder::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore> {
        self.shared.lock()
    }

    // == Get ==
    /// Returns the value stored under `key` and refreshes its timestamp.
    ///
    /// An entry past its TTL is still returned until a sweep removes it.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key, Instant::now())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// When a size bound is configured, other entries are evicted in
    /// unspecified order until the new value fits. The write itself is
    /// never refused.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let mut removed = Vec::new();
        self.lock()
            .set(key.into(), value.into(), Instant::now(), &mut removed);
        self.shared.notify(removed);
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let mut removed = Vec::new();
        let existed = self
            .lock()
            .remove(key, RemovalCause::Explicit, &mut removed);
        self.shared.notify(removed);
        existed
    }

    // == Purge Expired ==
    /// Runs one sweep pass immediately. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.shared.purge_expired()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Checks presence without refreshing the entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn max_size_bytes(&self) -> Option<u64> {
        self.lock().max_size_bytes()
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.lock().ttl()
    }

    // == Start Expiring ==
    /// Launches the background sweep, running [`purge_expired`] every
    /// `interval` until the returned handle is stopped or dropped.
    ///
    /// Only one sweep may run per cache: a second call while one is active
    /// fails with [`CacheError::SweepAlreadyRunning`]. Must be called from
    /// within a tokio runtime.
    ///
    /// [`purge_expired`]: BoundedExpiringCache::purge_expired
    pub fn start_expiring(&self, interval: Duration) -> Result<SweepHandle> {
        if interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CacheError::Internal(
                "expiry sweep requires a tokio runtime".to_string(),
            ));
        }

        let first_tick = Instant::now().checked_add(interval).ok_or_else(|| {
            CacheError::InvalidConfig(format!(
                "sweep interval of {}s is too large",
                interval.as_secs()
            ))
        })?;

        if self
            .shared
            .sweeping
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CacheError::SweepAlreadyRunning);
        }

        Ok(spawn_sweep_task(
            Arc::downgrade(&self.shared),
            first_tick,
            interval,
        ))
    }

    /// Whether a background sweep currently owns this cache.
    pub fn is_sweeping(&self) -> bool {
        self.shared.sweeping.load(Ordering::Acquire)
    }
}

impl fmt::Debug for BoundedExpiringCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedExpiringCache")
            .field("stats", &self.stats())
            .field("max_size_bytes", &self.max_size_bytes())
            .field("ttl", &self.ttl())
            .field("has_listener", &self.shared.listener.is_some())
            .finish()
    }
}

// == Cache Builder ==
/// Configures a [`BoundedExpiringCache`] before construction.
#[derive(Default)]
pub struct CacheBuilder {
    max_size_bytes: Option<u64>,
    ttl: Option<Duration>,
    listener: Option<EvictionListener>,
}

impl CacheBuilder {
    /// Caps the total bytes held by live values.
    pub fn max_size_bytes(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = Some(max_size_bytes);
        self
    }

    /// Expires entries once their age since last touch reaches `ttl`.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Observes every removal: explicit deletes, size evictions and sweeps.
    ///
    /// Notifications are delivered after the cache lock is released, so they
    /// are not linearized with other operations: by the time a listener sees
    /// a `Size` or `Expired` removal, another caller may already have stored
    /// the same key again. Each removal is still reported exactly once.
    pub fn eviction_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str, RemovalCause) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn build(self) -> Result<BoundedExpiringCache> {
        if self.max_size_bytes == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_size_bytes must be greater than zero; use None for unbounded".to_string(),
            ));
        }
        if self.ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(CacheError::InvalidConfig(
                "ttl must be greater than zero; use None to disable expiry".to_string(),
            ));
        }

        Ok(BoundedExpiringCache {
            shared: Arc::new(Shared {
                store: Mutex::new(CacheStore::new(self.max_size_bytes, self.ttl)),
                listener: self.listener,
                sweeping: AtomicBool::new(false),
            }),
        })
    }
}

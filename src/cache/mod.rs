//! Cache Module
//!
//! Provides a bounded, self-expiring in-memory byte cache.
//!
//! Only the synchronized [`BoundedExpiringCache`] is reachable from outside
//! the crate; the unlocked store behind it is not:
//!
//! ```compile_fail
//! use blobcache::cache::CacheStore;
//! ```

mod bounded;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use bounded::{BoundedExpiringCache, CacheBuilder, EvictionListener};
pub(crate) use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::RemovalCause;

pub(crate) use bounded::Shared;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes accepted over HTTP
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

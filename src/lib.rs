//! Blobcache - A bounded, self-expiring in-memory byte cache
//!
//! Stores opaque byte values under string keys, evicts entries past a
//! configurable age with a background sweep, and keeps total occupancy
//! under an optional byte ceiling.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{BoundedExpiringCache, CacheStats, RemovalCause};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::SweepHandle;

//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Expiry sweep: removes entries older than the cache TTL at a fixed interval

mod sweep;

pub use sweep::SweepHandle;
pub(crate) use sweep::spawn_sweep_task;

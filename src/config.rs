//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{BoundedExpiringCache, CacheBuilder};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Zero is accepted here as "disabled" and translated to `None` when the cache
/// is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// Total byte ceiling for stored values, 0 = unbounded
    pub max_size_bytes: u64,
    /// Seconds an untouched entry may live, 0 = never expires
    pub entry_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE_BYTES` - Byte ceiling (default: 64 MiB, 0 = unbounded)
    /// - `ENTRY_TTL_SECS` - Entry TTL in seconds (default: 300, 0 = never)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size_bytes: env_or("MAX_SIZE_BYTES", defaults.max_size_bytes),
            entry_ttl: env_or("ENTRY_TTL_SECS", defaults.entry_ttl),
            sweep_interval: env_or("SWEEP_INTERVAL_SECS", defaults.sweep_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Cache builder with the configured bounds.
    pub fn cache_builder(&self) -> CacheBuilder {
        let mut builder = BoundedExpiringCache::builder();
        if self.max_size_bytes > 0 {
            builder = builder.max_size_bytes(self.max_size_bytes);
        }
        if self.entry_ttl > 0 {
            builder = builder.ttl(Duration::from_secs(self.entry_ttl));
        }
        builder
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size_bytes: 64 * 1024 * 1024,
            entry_ttl: 300,
            sweep_interval: 1,
            server_port: 3000,
        }
    }
}

//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::Shared;
use crate::error::{CacheError, Result};

// == Sweep Handle ==
/// Controls a running expiry sweep.
///
/// Dropping the handle signals the task to stop without waiting for it.
/// Use [`stop`](SweepHandle::stop) to wait until the task has exited.
#[derive(Debug)]
pub struct SweepHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the sweep to stop and waits for it to exit.
    ///
    /// A pass already in progress runs to completion first. Once this
    /// returns, the cache accepts a new [`start_expiring`] call.
    ///
    /// [`start_expiring`]: crate::cache::BoundedExpiringCache::start_expiring
    pub async fn stop(self) -> Result<()> {
        let SweepHandle { stop_tx, join } = self;

        // The task may already be gone if the cache was dropped
        let _ = stop_tx.send(());

        join.await
            .map_err(|err| CacheError::Internal(format!("expiry sweep task failed: {err}")))
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Clears the cache's sweeping flag however the task ends.
struct SweepGuard(Weak<Shared>);

impl Drop for SweepGuard {
    fn drop(&mut self) {
        if let Some(shared) = self.0.upgrade() {
            shared.finish_sweep();
        }
    }
}

/// Spawns the sweep loop for a cache.
///
/// The first pass happens at `first_tick`; ticks missed under
/// load are delayed rather than bunched. The task holds only a weak
/// reference and exits on its own once every cache handle is dropped.
pub(crate) fn spawn_sweep_task(
    cache: Weak<Shared>,
    first_tick: Instant,
    interval: Duration,
) -> SweepHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        let _guard = SweepGuard(cache.clone());
        let mut ticker = interval_at(first_tick, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_ms = interval.as_millis() as u64, "Starting expiry sweep");

        loop {
            tokio::select! {
                biased;

                _ = &mut stop_rx => {
                    info!("Expiry sweep stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(shared) = cache.upgrade() else {
                        warn!("Cache dropped, ending expiry sweep");
                        break;
                    };

                    let removed = shared.purge_expired();
                    drop(shared);

                    if removed > 0 {
                        info!("Expiry sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Expiry sweep: no expired entries found");
                    }
                }
            }
        }
    });

    SweepHandle { stop_tx, join }
}

//! TTL Sweep Task
//!
//! Background task that periodically removes expired local entries, so
//! entries nobody reads again don't linger until eviction.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::LocalStore;

const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to a running sweep. Dropping it stops the task.
#[derive(Debug)]
pub struct SweepHandle {
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Stops the sweep.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that calls [`LocalStore::sweep_expired`] every `interval`.
///
/// The task only holds a weak reference and exits on its own once the store
/// is dropped. The sweep takes the store's regular lock, so it serializes
/// with foreground operations.
///
/// # Example
/// ```ignore
/// let store = Arc::new(LocalStore::new());
/// let sweeper = spawn_sweep_task(&store, Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.stop();
/// ```
pub fn spawn_sweep_task(store: &Arc<LocalStore>, interval: Duration) -> SweepHandle {
    let store = Arc::downgrade(store);
    let period = interval.max(MIN_INTERVAL);

    let handle = tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                debug!("Local store dropped, sweep task exiting");
                break;
            };

            let removed = store.sweep_expired().await;
            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    });

    SweepHandle { handle }
}

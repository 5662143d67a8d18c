//! TTL Sweeper Task
//!
//! Background task that counts down entry TTLs and evicts expired entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::KeyValueStore;

/// Spawns a background task that sweeps the store at a fixed rate.
///
/// Each tick subtracts the interval, in milliseconds, from every entry's TTL
/// and evicts the entries that reach zero. A pass holds the store's write
/// lock from start to finish, so it never interleaves with a `set` or
/// `remove` on the same key. Missed ticks are replayed as a burst so the
/// countdown tracks wall-clock time.
///
/// # Arguments
/// * `store` - Shared store to sweep
/// * `interval` - Tick period, at least one millisecond
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(KeyValueStore::default());
/// let sweeper = spawn_sweeper_task(store.clone(), Duration::from_millis(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper_task(store: Arc<KeyValueStore>, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(Duration::from_millis(1));
    let step = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX);

    tokio::spawn(async move {
        info!(
            "Starting TTL sweeper with interval of {} ms",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let expired = store.sweep(step);
            if !expired.is_empty() {
                debug!("TTL sweep: evicted {} entries", expired.len());
            }
        }
    })
}

//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries out of the
//! in-memory cache store. Reads already treat expired entries as absent;
//! the sweep only bounds memory held by keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// # Arguments
/// * `store` - shared handle to the in-memory cache store
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_cleanup_task(
    store: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                guard.cleanup_expired()
            };

            if removed > 0 {
                info!("Cache cleanup: removed {} expired entries", removed);
            } else {
                debug!("Cache cleanup: no expired entries found");
            }
        }
    })
}

//! Expired-Entry Sweeper
//!
//! Background task that periodically reclaims memory held by expired entries.
//! Lookups already hide expired entries, so the sweeper never changes what
//! callers observe.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a background task that calls [`Cache::clean_expired`] every `interval`.
///
/// The task loops until aborted through the returned handle.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Cache::new());
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper(cache: Arc<Cache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry sweeper with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.clean_expired();

            if removed > 0 {
                info!(removed, remaining = cache.len(), "Sweep removed expired entries");
            } else {
                debug!("Sweep found no expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let cache = Arc::new(Cache::new());
        cache.set("expire_soon", "value", Duration::from_millis(20));

        let handle = spawn_sweeper(cache.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.len(), 0, "Expired entry should have been swept");
        assert!(cache.stats().swept >= 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_live_entries() {
        let cache = Arc::new(Cache::new());
        cache.set("long_lived", "value", Duration::from_secs(3600));

        let handle = spawn_sweeper(cache.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("long_lived"), Some(Bytes::from("value")));
        assert_eq!(cache.len(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_can_be_aborted() {
        let cache = Arc::new(Cache::new());

        let handle = spawn_sweeper(cache, Duration::from_millis(10));
        handle.abort();

        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());
    }
}

//! Shared Cache Handle
//!
//! Thread-safe wrapper that pairs a [`CacheStore`] with its reaper.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::time::{Duration, Instant};

use crate::cache::{CacheStats, CacheStore};
use crate::tasks::{spawn_reaper, ReaperHandle, ReaperState};

// == Cache ==
/// Time-expiring cache of response bodies keyed by request URL.
///
/// Cloning is cheap and every clone shares the same entries and reaper.
/// `get` and `add` only hold the lock for the map operation itself, so
/// callers must do their network I/O before or after calling in.
///
/// # Example
/// ```ignore
/// let cache = Cache::new(Duration::from_secs(300));
/// cache.add("https://pokeapi.co/api/v2/pokemon/pikachu", body);
/// let hit = cache.get("https://pokeapi.co/api/v2/pokemon/pikachu");
/// cache.stop();
/// ```
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<Mutex<CacheStore>>,
    reaper: Arc<ReaperHandle>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache whose reaper sweeps once per `ttl`.
    ///
    /// A zero TTL is accepted; every entry then reads as absent.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime, which the reaper needs.
    pub fn new(ttl: Duration) -> Self {
        Self::with_interval(ttl, ttl)
    }

    /// Creates a cache with a reaper interval tuned separately from the TTL.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime, which the reaper needs.
    pub fn with_interval(ttl: Duration, interval: Duration) -> Self {
        let store = Arc::new(Mutex::new(CacheStore::new(ttl)));
        let reaper = spawn_reaper(store.clone(), interval);

        Self {
            store,
            reaper: Arc::new(reaper),
        }
    }

    // == Add ==
    /// Inserts or replaces the value for `key`, restarting its lifetime.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        let (key, value) = (key.into(), value.into());
        self.store.lock().add(key, value, Instant::now());
    }

    // == Get ==
    /// Returns the value for `key` unless it is absent or has expired.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.store.lock().get(key, Instant::now())
    }

    // == Stop ==
    /// Stops the reaper. Entries already stored stay in memory but still
    /// read as absent once they expire.
    pub fn stop(&self) {
        self.reaper.stop();
    }

    // == Reaper State ==
    /// Returns whether the reaper is running or stopped.
    pub fn reaper_state(&self) -> ReaperState {
        self.reaper.state()
    }

    // == TTL ==
    /// Returns the lifetime shared by every entry.
    pub fn ttl(&self) -> Duration {
        self.store.lock().ttl()
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    // == Length ==
    /// Number of stored entries, counting expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    // == Is Empty ==
    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tokio::time;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_cache_miss_then_hit() {
        let cache = Cache::new(FIVE_MINUTES);

        assert_eq!(cache.get("k"), None);
        cache.add("k", &b"v"[..]);
        assert_eq!(cache.get("k"), Some(Bytes::from_static(b"v")));
        cache.stop();
    }

    #[tokio::test]
    async fn test_cache_overwrite() {
        let cache = Cache::new(FIVE_MINUTES);

        cache.add("k", &b"v1"[..]);
        cache.add("k", &b"v2"[..]);

        assert_eq!(cache.get("k"), Some(Bytes::from_static(b"v2")));
        assert_eq!(cache.len(), 1);
        cache.stop();
    }

    #[tokio::test]
    async fn test_cache_clones_share_entries() {
        let cache = Cache::new(FIVE_MINUTES);
        let other = cache.clone();

        cache.add("a", &b"x"[..]);
        other.add("b", &b"y"[..]);

        assert_eq!(other.get("a"), Some(Bytes::from_static(b"x")));
        assert_eq!(cache.get("b"), Some(Bytes::from_static(b"y")));
        cache.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_rejects_stale_entry_before_sweep() {
        // Reaper far in the future so only the staleness check applies
        let cache = Cache::with_interval(FIVE_MINUTES, Duration::from_secs(3600));
        cache.add("k", &b"v"[..]);

        time::advance(FIVE_MINUTES).await;

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 1, "Entry is stale but not yet swept");
        cache.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_sweeps_after_ttl() {
        let cache = Cache::new(FIVE_MINUTES);
        cache.add("k", &b"v"[..]);

        time::advance(FIVE_MINUTES + Duration::from_millis(1)).await;
        time::sleep(Duration::from_millis(1)).await;

        assert!(cache.is_empty());
        assert_eq!(cache.stats().reaped, 1);
        cache.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_twice_leaves_entries_in_place() {
        let cache = Cache::new(FIVE_MINUTES);
        cache.stop();
        cache.stop();
        assert_eq!(cache.reaper_state(), ReaperState::Stopped);

        cache.add("k", &b"v"[..]);
        time::advance(FIVE_MINUTES * 3).await;
        time::sleep(Duration::from_millis(1)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);

        // Overwriting still works after stop
        cache.add("k", &b"v2"[..]);
        assert_eq!(cache.get("k"), Some(Bytes::from_static(b"v2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_serves_entries() {
        let cache = Cache::new(Duration::ZERO);

        cache.add("k", &b"v"[..]);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.reaper_state(), ReaperState::Running);

        time::sleep(Duration::from_millis(5)).await;
        assert!(cache.is_empty(), "Reaper should sweep with a clamped interval");
        cache.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_does_not_panic() {
        let cache = Cache::with_interval(Duration::MAX, Duration::MAX);

        cache.add("k", &b"v"[..]);
        time::advance(Duration::from_secs(3600)).await;

        assert_eq!(cache.get("k"), Some(Bytes::from_static(b"v")));
        assert_eq!(cache.reaper_state(), ReaperState::Running);
        cache.stop();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_add_and_get() {
        // Short interval so sweeps interleave with the workers
        let cache = Cache::with_interval(Duration::from_millis(20), Duration::from_millis(5));
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..2_000 {
                        let shared = format!("shared-{}", i % 16);
                        let own = format!("worker-{worker}-{}", i % 64);

                        cache.add(shared.clone(), format!("{worker}:{i}").into_bytes());
                        cache.add(own.clone(), format!("{i}").into_bytes());

                        if let Some(value) = cache.get(&shared) {
                            let text = String::from_utf8(value.to_vec()).unwrap();
                            assert!(text.contains(':'), "Shared value corrupted: {text}");
                        }
                        if let Some(value) = cache.get(&own) {
                            let n: usize = String::from_utf8(value.to_vec()).unwrap().parse().unwrap();
                            assert_eq!(n % 64, i % 64, "Own key returned a foreign value");
                        }
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker panicked");
        }

        assert!(cache.len() <= 16 + 8 * 64);
        cache.stop();
    }
}

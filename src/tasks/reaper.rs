//! Cache Reaper Task
//!
//! Background task that periodically sweeps expired entries out of the
//! cache, independent of reads and writes.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Shortest period the reaper will tick at; tokio rejects a zero period.
pub const MIN_REAP_INTERVAL: Duration = Duration::from_millis(1);

/// Longest period the reaper will tick at, keeping timer deadlines representable.
pub const MAX_REAP_INTERVAL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Lifecycle state of a reaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaperState {
    /// Ticking on its interval and sweeping each tick
    Running,
    /// Stop was requested; no further sweeps happen
    Stopped,
}

// == Reaper Handle ==
/// Controls a reaper spawned by [`spawn_reaper`].
///
/// Dropping every handle also ends the task, but callers should stop it
/// explicitly with [`ReaperHandle::stop`].
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    // == Stop ==
    /// Signals the reaper to stop. Safe to call any number of times.
    pub fn stop(&self) {
        let already_stopped = self.shutdown_tx.send_replace(true);
        if !already_stopped {
            info!("Cache reaper stop requested");
        }
    }

    // == State ==
    /// Returns whether the reaper is still sweeping.
    pub fn state(&self) -> ReaperState {
        if *self.shutdown_tx.borrow() {
            ReaperState::Stopped
        } else {
            ReaperState::Running
        }
    }

    /// True once the task has exited after a stop.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns the reaper for `store`, sweeping every `interval`.
///
/// The first sweep happens one full interval after this call. Sweeps hold
/// the store lock for their whole duration. The interval is clamped to
/// [`MIN_REAP_INTERVAL`]..=[`MAX_REAP_INTERVAL`].
///
/// # Panics
/// Panics if called outside of a Tokio runtime.
pub fn spawn_reaper(store: Arc<Mutex<CacheStore>>, interval: Duration) -> ReaperHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let interval = interval.clamp(MIN_REAP_INTERVAL, MAX_REAP_INTERVAL);

    // Anchored here, not at first poll, so sweeps line up with construction time
    let now = Instant::now();
    let start = now.checked_add(interval).unwrap_or(now);
    let mut ticker = time::interval_at(start, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let task = tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Cache reaper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (removed, remaining) = {
                        let mut guard = store.lock();
                        let removed = guard.sweep(Instant::now());
                        (removed, guard.len())
                    };

                    if removed > 0 {
                        info!(removed, remaining, "Cache sweep removed expired entries");
                    } else {
                        debug!(remaining, "Cache sweep found no expired entries");
                    }
                }
                changed = shutdown_rx.changed() => {
                    // A closed channel means every handle is gone
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Cache reaper stopped");
    });

    ReaperHandle { shutdown_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    const TTL: Duration = Duration::from_secs(5);

    fn shared_store() -> Arc<Mutex<CacheStore>> {
        Arc::new(Mutex::new(CacheStore::new(TTL)))
    }

    /// Lets the reaper task run whatever became ready after a clock change.
    async fn settle() {
        tokio::task::yield_now().await;
        time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_removes_expired_entries() {
        let store = shared_store();
        store.lock().add("expire_soon".to_string(), Bytes::from_static(b"v"), Instant::now());

        let handle = spawn_reaper(store.clone(), TTL);

        time::advance(TTL + Duration::from_millis(1)).await;
        settle().await;

        assert!(store.lock().is_empty(), "Expired entry should have been swept");
        assert_eq!(store.lock().stats().reaped, 1);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_preserves_fresh_entries() {
        let store = shared_store();
        let handle = spawn_reaper(store.clone(), TTL);

        time::advance(Duration::from_secs(3)).await;
        store.lock().add("young".to_string(), Bytes::from_static(b"v"), Instant::now());

        // First sweep at t=5s sees an entry aged 2s
        time::advance(Duration::from_secs(2) + Duration::from_millis(1)).await;
        settle().await;

        assert_eq!(store.lock().len(), 1, "Fresh entry should survive the sweep");
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_stop_is_idempotent() {
        let store = shared_store();
        let handle = spawn_reaper(store.clone(), TTL);
        assert_eq!(handle.state(), ReaperState::Running);

        handle.stop();
        handle.stop();
        assert_eq!(handle.state(), ReaperState::Stopped);

        settle().await;
        assert!(handle.is_finished(), "Task should exit after stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_does_not_sweep_after_stop() {
        let store = shared_store();
        let handle = spawn_reaper(store.clone(), TTL);
        handle.stop();
        settle().await;

        store.lock().add("stale".to_string(), Bytes::from_static(b"v"), Instant::now());
        time::advance(TTL * 3).await;
        settle().await;

        assert_eq!(store.lock().len(), 1, "Stopped reaper must not sweep");
        assert_eq!(store.lock().stats().reaped, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_zero_interval_is_clamped() {
        let store = shared_store();
        store.lock().add("k".to_string(), Bytes::from_static(b"v"), Instant::now());

        let handle = spawn_reaper(store.clone(), Duration::ZERO);
        assert_eq!(handle.state(), ReaperState::Running);

        time::advance(TTL + MIN_REAP_INTERVAL).await;
        settle().await;

        assert!(store.lock().is_empty());
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_huge_interval_does_not_overflow() {
        let store = shared_store();
        store.lock().add("k".to_string(), Bytes::from_static(b"v"), Instant::now());

        let handle = spawn_reaper(store.clone(), Duration::MAX);
        time::advance(Duration::from_secs(60)).await;
        settle().await;

        // Capped interval has not elapsed yet, so nothing is swept
        assert_eq!(store.lock().len(), 1);
        assert_eq!(handle.state(), ReaperState::Running);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_exits_when_handle_dropped() {
        let store = shared_store();
        let handle = spawn_reaper(store.clone(), TTL);
        drop(handle);
        settle().await;

        // Only the test's reference remains once the task has ended
        assert_eq!(Arc::strong_count(&store), 1);
    }
}

//! Cache Store Module
//!
//! The unsynchronized map behind [`Cache`](super::Cache). Every operation
//! takes the current instant explicitly so expiry is deterministic to test.

use std::collections::HashMap;

use bytes::Bytes;
use tokio::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Key to entry mapping with a single TTL shared by every entry.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lifetime of every entry, fixed at construction
    ttl: Duration,
    /// Lookup and sweep counters
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries all live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            stats: CacheStats::new(),
        }
    }

    // == TTL ==
    /// Returns the lifetime shared by every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Add ==
    /// Inserts or replaces the entry for `key`, stamped with `now`.
    ///
    /// A replaced entry loses both its value and its timestamp.
    pub fn add(&mut self, key: String, value: Bytes, now: Instant) {
        self.entries.insert(key, CacheEntry::stamped(value, now));
    }

    // == Get ==
    /// Returns the value for `key` if present and younger than the TTL.
    ///
    /// Expired entries are reported as misses but left in place; removing
    /// them is the reaper's job.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<Bytes> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl, now) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Sweep ==
    /// Removes every entry whose age has reached the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl, now));

        let removed = before - self.entries.len();
        self.stats.record_reaped(removed);
        removed
    }

    // == Stats ==
    /// Returns the counters with the current entry count filled in.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Number of stored entries, counting expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

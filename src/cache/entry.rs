//! Cache Entry Module
//!
//! Defines a single cached response body and its creation time.

use bytes::Bytes;
use tokio::time::{Duration, Instant};

// == Cache Entry ==
/// A cached value stamped with the instant it was inserted.
///
/// Timestamps come from `tokio::time::Instant` so that a paused test clock
/// drives expiry the same way it drives the reaper's timer.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes, shared rather than copied on read
    pub value: Bytes,
    /// Insertion instant, never mutated after construction
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(value: Bytes) -> Self {
        Self::stamped(value, Instant::now())
    }

    /// Creates an entry stamped with an explicit instant.
    pub fn stamped(value: Bytes, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    // == Age ==
    /// Time elapsed between creation and `now`, zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is expired, so
    /// it is visible only while `now - created_at < ttl`.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) >= ttl
    }
}

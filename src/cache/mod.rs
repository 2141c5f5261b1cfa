//! Cache Module
//!
//! In-process cache of API responses with a single TTL and a background
//! reaper that sweeps expired entries.

mod entry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Lifetime of cached responses when none is configured
pub const DEFAULT_TTL_SECS: u64 = 300;

//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the REPL.
//!
//! # Tasks
//! - Cache reaper: sweeps expired cache entries on a fixed interval

mod reaper;

pub use reaper::{
    spawn_reaper, ReaperHandle, ReaperState, MAX_REAP_INTERVAL, MIN_REAP_INTERVAL,
};

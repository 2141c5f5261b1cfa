//! Configuration Module
//!
//! Loads REPL settings from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_SECS;

/// Base URL of the public PokeAPI.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Largest accepted value for any seconds setting (one year).
pub const MAX_SECONDS: u64 = 365 * 24 * 60 * 60;

/// REPL configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime of cached responses in seconds
    pub cache_ttl: u64,
    /// Seconds between reaper sweeps
    pub reap_interval: u64,
    /// PokeAPI base URL, without a trailing slash
    pub api_base_url: String,
    /// HTTP request timeout in seconds
    pub http_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POKEDEX_CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `POKEDEX_REAP_INTERVAL` - Sweep interval in seconds (default: the TTL)
    /// - `POKEDEX_API_BASE_URL` - API base URL (default: https://pokeapi.co/api/v2)
    /// - `POKEDEX_HTTP_TIMEOUT` - Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Missing, empty, zero, unparseable or larger than [`MAX_SECONDS`]
    /// numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let seconds = |name: &str| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| (1..=MAX_SECONDS).contains(v))
        };

        let cache_ttl = seconds("POKEDEX_CACHE_TTL").unwrap_or(defaults.cache_ttl);

        Self {
            cache_ttl,
            reap_interval: seconds("POKEDEX_REAP_INTERVAL").unwrap_or(cache_ttl),
            api_base_url: lookup("POKEDEX_API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            http_timeout: seconds("POKEDEX_HTTP_TIMEOUT").unwrap_or(defaults.http_timeout),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL_SECS,
            reap_interval: DEFAULT_TTL_SECS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: 30,
        }
    }
}

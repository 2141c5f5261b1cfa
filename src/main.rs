//! Pokedex CLI - An interactive Pokedex backed by PokeAPI
//!
//! Logs go to stderr so they never interleave with REPL output.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex_cli::{Cache, Config, PokeClient, Repl};

/// Main entry point for the Pokedex REPL.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the response cache, which starts its reaper
/// 4. Run the REPL on stdin/stdout until `exit` or end of input
/// 5. Stop the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to warnings only, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedex_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}s, reap_interval={}s, api_base_url={}",
        config.cache_ttl, config.reap_interval, config.api_base_url
    );

    let cache = Cache::with_interval(config.cache_ttl(), config.reap_interval());
    let client = PokeClient::new(&config, cache.clone()).context("failed to build HTTP client")?;

    let mut repl = Repl::new(client);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let outcome = repl.run(stdin, &mut stdout).await;

    cache.stop();
    let stats = cache.stats();
    info!(
        "Session finished: hits={}, misses={}, reaped={}",
        stats.hits, stats.misses, stats.reaped
    );

    outcome.context("REPL terminated")
}

//! Error types for the Pokedex REPL
//!
//! Provides unified error handling using thiserror. The cache itself never
//! fails; these cover the HTTP layer and command handling around it.

use reqwest::StatusCode;
use thiserror::Error;

// == Pokedex Error Enum ==
/// Unified error type for API calls and REPL commands.
#[derive(Error, Debug)]
pub enum PokedexError {
    /// Request could not be sent or its body could not be read
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// Response body was not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Command was called with the wrong arguments
    #[error("{0}")]
    Usage(String),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PokedexError {
    pub fn usage(message: impl Into<String>) -> Self {
        PokedexError::Usage(message.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the Pokedex REPL.
pub type Result<T> = std::result::Result<T, PokedexError>;

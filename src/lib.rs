//! Pokedex CLI - An interactive Pokedex backed by PokeAPI
//!
//! API responses are kept in a time-expiring in-process cache shared by all
//! REPL commands and swept by a background reaper.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repl;
pub mod tasks;

pub use api::PokeClient;
pub use cache::Cache;
pub use config::Config;
pub use error::{PokedexError, Result};
pub use repl::Repl;

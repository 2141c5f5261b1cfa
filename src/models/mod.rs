//! API Response Models
//!
//! Only the PokeAPI fields the REPL prints are modeled; serde skips the rest.

mod location;
mod pokemon;

use serde::Deserialize;

pub use location::{LocationArea, LocationAreaPage, PokemonEncounter};
pub use pokemon::{Pokemon, PokemonStat, PokemonType};

/// A `{ name, url }` reference to another API resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

//! REPL Commands
//!
//! Command registry and the handler for each command.

use std::io::Write;

use rand::RngCore;
use tracing::debug;

use super::Repl;
use crate::error::{PokedexError, Result};
use crate::models::LocationAreaPage;

/// Upper bound (exclusive) of a catch roll.
pub const CATCH_ROLL_RANGE: u32 = 256;

/// What the loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Every command the REPL understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    Mapb,
    Explore,
    Catch,
    Inspect,
    Pokedex,
    Cache,
}

impl Command {
    /// Commands in the order `help` lists them.
    pub const ALL: [Command; 9] = [
        Command::Help,
        Command::Exit,
        Command::Map,
        Command::Mapb,
        Command::Explore,
        Command::Catch,
        Command::Inspect,
        Command::Pokedex,
        Command::Cache,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Exit => "exit",
            Command::Map => "map",
            Command::Mapb => "mapb",
            Command::Explore => "explore",
            Command::Catch => "catch",
            Command::Inspect => "inspect",
            Command::Pokedex => "pokedex",
            Command::Cache => "cache",
        }
    }

    /// Invocation shown in `help` and usage errors.
    pub fn usage(self) -> &'static str {
        match self {
            Command::Explore => "explore <area_name>",
            Command::Catch => "catch <pokemon_name>",
            Command::Inspect => "inspect <pokemon_name>",
            other => other.name(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "Displays a help message",
            Command::Exit => "Exit the Pokedex",
            Command::Map => "Displays the names of 20 location areas in the Pokemon world. Each subsequent call displays the next 20 locations.",
            Command::Mapb => "Displays the names of the previous 20 location areas in the Pokemon world. It's a way to go back.",
            Command::Explore => "Explore a location area",
            Command::Catch => "Attempt to catch a pokemon",
            Command::Inspect => "Display details of a caught pokemon",
            Command::Pokedex => "Show all caught pokemon",
            Command::Cache => "Show response cache statistics",
        }
    }

    /// Number of arguments the command takes.
    fn arity(self) -> usize {
        match self {
            Command::Explore | Command::Catch | Command::Inspect => 1,
            _ => 0,
        }
    }

    fn check_args(self, args: &[String]) -> Result<()> {
        // Extra arguments to argument-less commands are ignored
        if self.arity() > 0 && args.len() != self.arity() {
            return Err(PokedexError::usage(format!("usage: {}", self.usage())));
        }
        Ok(())
    }
}

// == Catch Odds ==
/// Rolls below this value let the pokemon escape.
///
/// Rises with base experience and is capped at 255, so a roll of 255 always
/// catches.
pub fn catch_threshold(base_experience: u32) -> u32 {
    (50 + base_experience / 3).min(255)
}

/// Draws a roll in `0..CATCH_ROLL_RANGE` from the low bits of one RNG word.
pub fn catch_roll<G: RngCore + ?Sized>(rng: &mut G) -> u32 {
    rng.next_u32() % CATCH_ROLL_RANGE
}

pub fn catch_succeeds(base_experience: u32, roll: u32) -> bool {
    roll >= catch_threshold(base_experience)
}

impl Repl {
    /// Runs `command` with already-cleaned `args`.
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        args: &[String],
        out: &mut W,
    ) -> Result<Flow> {
        command.check_args(args)?;
        debug!(command = command.name(), ?args, "Executing command");

        match command {
            Command::Help => self.command_help(out),
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                Ok(Flow::Exit)
            }
            Command::Map => self.command_map(out).await,
            Command::Mapb => self.command_mapb(out).await,
            Command::Explore => self.command_explore(&args[0], out).await,
            Command::Catch => self.command_catch(&args[0], out).await,
            Command::Inspect => self.command_inspect(&args[0], out),
            Command::Pokedex => self.command_pokedex(out),
            Command::Cache => self.command_cache(out),
        }
    }

    fn command_help<W: Write>(&self, out: &mut W) -> Result<Flow> {
        writeln!(out)?;
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for command in Command::ALL {
            writeln!(out, "{}: {}", command.usage(), command.description())?;
        }
        writeln!(out)?;
        Ok(Flow::Continue)
    }

    async fn command_map<W: Write>(&mut self, out: &mut W) -> Result<Flow> {
        // Past the last page the cursor is empty and map starts over
        let url = self.session.next_location_url.clone();
        let page = self.client.location_areas(url.as_deref()).await?;
        self.show_page(&page, out)
    }

    async fn command_mapb<W: Write>(&mut self, out: &mut W) -> Result<Flow> {
        let Some(url) = self.session.previous_location_url.clone() else {
            writeln!(out, "you're on the first page")?;
            return Ok(Flow::Continue);
        };

        let page = self.client.location_areas(Some(&url)).await?;
        self.show_page(&page, out)
    }

    fn show_page<W: Write>(&mut self, page: &LocationAreaPage, out: &mut W) -> Result<Flow> {
        self.session.follow(page);
        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        Ok(Flow::Continue)
    }

    async fn command_explore<W: Write>(&mut self, area_name: &str, out: &mut W) -> Result<Flow> {
        writeln!(out, "Exploring {area_name}...")?;

        let area = self.client.location_area(area_name).await?;
        writeln!(out, "Found Pokemon:")?;
        for name in area.pokemon_names() {
            writeln!(out, " - {name}")?;
        }
        Ok(Flow::Continue)
    }

    async fn command_catch<W: Write>(&mut self, pokemon_name: &str, out: &mut W) -> Result<Flow> {
        writeln!(out, "Throwing a Pokeball at {pokemon_name}...")?;

        let pokemon = self.client.pokemon(pokemon_name).await?;
        let roll = catch_roll(self.rng.as_mut());
        let base_experience = pokemon.base_experience.unwrap_or(0);
        debug!(pokemon = pokemon_name, base_experience, roll, "Catch roll");

        if !catch_succeeds(base_experience, roll) {
            writeln!(out, "{pokemon_name} escaped!")?;
            return Ok(Flow::Continue);
        }

        writeln!(out, "{pokemon_name} was caught!")?;
        writeln!(out, "You may now inspect it with the inspect command.")?;
        self.session.caught.insert(pokemon_name.to_string(), pokemon);
        Ok(Flow::Continue)
    }

    fn command_inspect<W: Write>(&self, pokemon_name: &str, out: &mut W) -> Result<Flow> {
        let Some(pokemon) = self.session.caught.get(pokemon_name) else {
            writeln!(out, "you have not caught that pokemon")?;
            return Ok(Flow::Continue);
        };

        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "  - {}", kind.kind.name)?;
        }
        writeln!(out)?;
        Ok(Flow::Continue)
    }

    fn command_pokedex<W: Write>(&self, out: &mut W) -> Result<Flow> {
        writeln!(out, "Your Pokedex:")?;

        if self.session.caught.is_empty() {
            writeln!(out, "You haven't caught any pokemon yet!")?;
            return Ok(Flow::Continue);
        }

        for name in self.session.caught.keys() {
            writeln!(out, " - {name}")?;
        }
        Ok(Flow::Continue)
    }

    fn command_cache<W: Write>(&self, out: &mut W) -> Result<Flow> {
        let cache = self.client.cache();
        let stats = cache.stats();

        writeln!(out, "Cache TTL: {}s", cache.ttl().as_secs())?;
        writeln!(out, "Entries: {}", stats.total_entries)?;
        writeln!(out, "Hits: {}", stats.hits)?;
        writeln!(out, "Misses: {}", stats.misses)?;
        writeln!(out, "Hit rate: {:.1}%", stats.hit_rate() * 100.0)?;
        writeln!(out, "Reaped: {}", stats.reaped)?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_parse_known_commands() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.name()), Some(command));
        }
        assert_eq!(Command::parse("fly"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_usage_includes_argument() {
        assert_eq!(Command::Explore.usage(), "explore <area_name>");
        assert_eq!(Command::Map.usage(), "map");
    }

    #[test]
    fn test_check_args() {
        let one = vec!["pikachu".to_string()];
        let two = vec!["pikachu".to_string(), "raichu".to_string()];

        assert!(Command::Catch.check_args(&one).is_ok());
        assert!(Command::Map.check_args(&two).is_ok());

        let err = Command::Inspect.check_args(&two).unwrap_err();
        assert_eq!(err.to_string(), "usage: inspect <pokemon_name>");
        assert!(Command::Explore.check_args(&[]).is_err());
    }

    #[test]
    fn test_catch_threshold() {
        assert_eq!(catch_threshold(0), 50);
        assert_eq!(catch_threshold(112), 87);
        assert_eq!(catch_threshold(608), 252);
        assert_eq!(catch_threshold(1000), 255);
    }

    #[test]
    fn test_catch_succeeds_at_threshold() {
        assert!(!catch_succeeds(112, 86));
        assert!(catch_succeeds(112, 87));
        assert!(catch_succeeds(1000, CATCH_ROLL_RANGE - 1));
    }

    #[test]
    fn test_catch_roll_stays_in_range() {
        let mut rng = StepRng::new(0, 255);
        let rolls: Vec<u32> = (0..4).map(|_| catch_roll(&mut rng)).collect();
        assert_eq!(rolls, vec![0, 255, 254, 253]);

        let mut rng = StepRng::new(u64::from(u32::MAX), 0);
        assert_eq!(catch_roll(&mut rng), CATCH_ROLL_RANGE - 1);
    }
}

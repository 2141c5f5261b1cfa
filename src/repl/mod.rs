//! REPL Module
//!
//! Reads commands line by line, dispatches them and prints their output.
//! Command failures are printed and the loop keeps going; only I/O errors on
//! the REPL's own streams end it early.

pub mod commands;
mod session;

use std::io::Write;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::api::PokeClient;
use crate::error::{PokedexError, Result};

pub use commands::{Command, Flow};
pub use session::Session;

/// Prompt printed before every line of input.
pub const PROMPT: &str = "Pokedex > ";

/// Splits a line into lowercase words, dropping surrounding whitespace.
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Interactive Pokedex session.
pub struct Repl {
    client: PokeClient,
    session: Session,
    rng: Box<dyn RngCore + Send>,
}

impl Repl {
    /// Creates a REPL whose catch rolls are seeded from the OS.
    pub fn new(client: PokeClient) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }

    /// Creates a REPL with a caller-supplied RNG for catch rolls.
    pub fn with_rng<G>(client: PokeClient, rng: G) -> Self
    where
        G: RngCore + Send + 'static,
    {
        Self {
            client,
            session: Session::new(),
            rng: Box::new(rng),
        }
    }

    /// Pagination state and caught pokemon so far.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `exit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                debug!("End of input");
                writeln!(out)?;
                return Ok(());
            };

            let words = clean_input(&line);
            let Some((name, args)) = words.split_first() else {
                continue;
            };

            let Some(command) = Command::parse(name) else {
                writeln!(out, "Unknown command")?;
                continue;
            };

            match self.execute(command, args, out).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(PokedexError::Io(err)) => return Err(err.into()),
                Err(err) => {
                    debug!(command = command.name(), error = %err, "Command failed");
                    writeln!(out, "Error: {err}")?;
                }
            }
        }
    }
}

//! Per-session REPL state

use std::collections::BTreeMap;

use crate::models::{LocationAreaPage, Pokemon};

/// Pagination cursor and caught pokemon for one REPL session.
#[derive(Debug, Default)]
pub struct Session {
    pub next_location_url: Option<String>,
    pub previous_location_url: Option<String>,
    /// Keyed by the name the user typed, listed alphabetically
    pub caught: BTreeMap<String, Pokemon>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the pagination cursor to the neighbours of `page`.
    pub fn follow(&mut self, page: &LocationAreaPage) {
        self.next_location_url = page.next.clone();
        self.previous_location_url = page.previous.clone();
    }
}

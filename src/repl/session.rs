//! REPL session state and command execution.

use std::io::Write;
use std::ops::ControlFlow;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::client::PokeClient;
use crate::error::{PokedexError, Result};
use crate::models::LocationAreaPage;
use crate::repl::{catch_probability, Command, Pokedex, COMMANDS};

/// State carried between commands: paging cursor, caught Pokemon, and the catch RNG.
#[derive(Debug)]
pub struct Session {
    client: PokeClient,
    next_page: Option<String>,
    previous_page: Option<String>,
    pokedex: Pokedex,
    rng: StdRng,
}

impl Session {
    /// Starts a session on the first location area page.
    pub fn new(client: PokeClient) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }

    pub fn with_rng(client: PokeClient, rng: StdRng) -> Self {
        Self {
            next_page: Some(client.location_areas_url()),
            previous_page: None,
            client,
            pokedex: Pokedex::new(),
            rng,
        }
    }

    pub fn pokedex(&self) -> &Pokedex {
        &self.pokedex
    }

    pub fn client(&self) -> &PokeClient {
        &self.client
    }

    /// Runs `command`, writing its output to `out`.
    ///
    /// Returns `Break` when the session should end.
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> Result<ControlFlow<()>> {
        debug!(?command, "Executing command");
        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(ControlFlow::Break(()));
            }
            Command::Map => {
                let url = self.next_page.clone().ok_or(PokedexError::NoNextPage)?;
                self.show_page(&url, out).await?;
            }
            Command::MapBack => {
                let url = self
                    .previous_page
                    .clone()
                    .ok_or(PokedexError::NoPreviousPage)?;
                self.show_page(&url, out).await?;
            }
            Command::Explore(area) => self.explore(&area, out).await?,
            Command::Catch(name) => self.catch(&name, out).await?,
            Command::Inspect(name) => self.inspect(&name, out)?,
            Command::Pokedex => self.list_pokedex(out)?,
            Command::Cache => self.cache_stats(out)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Welcome to the Pokedex")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for info in COMMANDS {
            writeln!(out, "{}: {}", info.name, info.description)?;
        }
        Ok(())
    }

    async fn show_page<W: Write>(&mut self, url: &str, out: &mut W) -> Result<()> {
        let page: LocationAreaPage = self.client.location_areas(url).await?;

        // Cursor only moves once the page was fetched
        self.next_page = page.next;
        self.previous_page = page.previous;
        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&mut self, area: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Exploring {}...", area)?;
        let location = self.client.location_area(area).await?;

        writeln!(out, "Found Pokemon:")?;
        for encounter in &location.pokemon_encounters {
            writeln!(out, " - {}", encounter.pokemon.name)?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Throwing a Pokeball at {}...", name)?;
        let pokemon = self.client.pokemon(name).await?;

        let chance = catch_probability(pokemon.base_experience.unwrap_or(0));
        let roll: f64 = self.rng.gen();
        debug!(pokemon = %pokemon.name, chance, roll, "Catch roll");
        if roll < chance {
            writeln!(out, "{} was caught!", pokemon.name)?;
            writeln!(out, "You may now inspect it with the inspect command.")?;
            self.pokedex.record(pokemon);
        } else {
            writeln!(out, "{} escaped!", pokemon.name)?;
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        let caught = self
            .pokedex
            .get(name)
            .ok_or_else(|| PokedexError::NotCaught(name.to_string()))?;
        let pokemon = &caught.pokemon;

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
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Your Pokedex:")?;
        for caught in self.pokedex.iter() {
            writeln!(
                out,
                " - {} (caught {})",
                caught.pokemon.name,
                caught.caught_at.format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        Ok(())
    }

    fn cache_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let cache = self.client.cache();
        let stats = cache.stats();

        writeln!(out, "Cache interval: {}s", cache.interval().as_secs_f64())?;
        writeln!(out, "Entries: {}", stats.total_entries)?;
        writeln!(out, "Hits: {}", stats.hits)?;
        writeln!(out, "Misses: {}", stats.misses)?;
        writeln!(out, "Hit rate: {:.1}%", stats.hit_rate() * 100.0)?;
        writeln!(out, "Sweeps: {}", stats.sweeps)?;
        writeln!(out, "Reaped: {}", stats.reaped)?;
        Ok(())
    }
}

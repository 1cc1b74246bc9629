//! REPL Module
//!
//! Turns user input into catalog lookups and renders the results.
//!
//! # Commands
//! - `help`, `exit`
//! - `map` / `mapb` - Page forward / back through location areas
//! - `explore <area>` - List Pokemon found in an area
//! - `catch <pokemon>` - Try to catch a Pokemon
//! - `inspect <pokemon>` - Show a caught Pokemon
//! - `pokedex` - List caught Pokemon
//! - `cache` - Show cache statistics

mod commands;
mod pokedex;
mod session;

pub use commands::{clean_input, Command, CommandInfo, COMMANDS};
pub use pokedex::{catch_probability, CaughtPokemon, Pokedex};
pub use session::Session;

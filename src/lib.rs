//! Pokedex - A command-line PokeAPI explorer
//!
//! Remote responses are kept in a time-expiring cache whose background
//! reaper ages entries out on a fixed interval.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod repl;
pub mod tasks;

pub use cache::Cache;
pub use client::PokeClient;
pub use config::Config;
pub use error::{CacheError, PokedexError, Result};
pub use repl::{Command, Session};

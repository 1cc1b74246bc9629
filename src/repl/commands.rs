//! Command parsing
//!
//! Maps tokenized input onto [`Command`] values.

use crate::error::{PokedexError, Result};

/// Name and help text of a REPL command.
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every command, in the order `help` lists them.
pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        description: "Displays a help message",
    },
    CommandInfo {
        name: "exit",
        description: "Exit the Pokedex",
    },
    CommandInfo {
        name: "map",
        description: "Displays the next 20 location areas",
    },
    CommandInfo {
        name: "mapb",
        description: "Displays the previous 20 location areas",
    },
    CommandInfo {
        name: "explore",
        description: "Lists the Pokemon in a location area: explore <area>",
    },
    CommandInfo {
        name: "catch",
        description: "Attempt to catch a Pokemon: catch <pokemon>",
    },
    CommandInfo {
        name: "inspect",
        description: "Inspect a Pokemon you caught: inspect <pokemon>",
    },
    CommandInfo {
        name: "pokedex",
        description: "Lists all the Pokemon you have caught",
    },
    CommandInfo {
        name: "cache",
        description: "Shows response cache statistics",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore(String),
    Catch(String),
    Inspect(String),
    Pokedex,
    Cache,
}

impl Command {
    /// Parses cleaned input words. Words past the argument are ignored.
    pub fn parse(words: &[String]) -> Result<Self> {
        let (name, rest) = match words.split_first() {
            Some((name, rest)) => (name.as_str(), rest),
            None => return Err(PokedexError::UnknownCommand(String::new())),
        };
        let argument = |command: &'static str, argument: &'static str| {
            rest.first()
                .cloned()
                .ok_or(PokedexError::MissingArgument { command, argument })
        };

        match name {
            "help" => Ok(Self::Help),
            "exit" => Ok(Self::Exit),
            "map" => Ok(Self::Map),
            "mapb" => Ok(Self::MapBack),
            "explore" => Ok(Self::Explore(argument("explore", "area")?)),
            "catch" => Ok(Self::Catch(argument("catch", "pokemon")?)),
            "inspect" => Ok(Self::Inspect(argument("inspect", "pokemon")?)),
            "pokedex" => Ok(Self::Pokedex),
            "cache" => Ok(Self::Cache),
            other => Err(PokedexError::UnknownCommand(other.to_string())),
        }
    }
}

/// Lowercases `text` and splits it on whitespace.
pub fn clean_input(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

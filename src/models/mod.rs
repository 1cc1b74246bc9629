//! PokeAPI payload models
//!
//! Only the fields the explorer reads are modeled; serde ignores the rest.

pub mod location;
pub mod pokemon;

// Re-export commonly used types
pub use location::{LocationArea, LocationAreaPage, NamedResource, PokemonEncounter};
pub use pokemon::{Pokemon, PokemonStat, PokemonType};

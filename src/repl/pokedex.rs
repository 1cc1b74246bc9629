//! Caught Pokemon collection

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::Pokemon;

/// Base experience at which the catch chance bottoms out.
const MAX_BASE_EXPERIENCE: f64 = 650.0;

/// Chance, in `[0, 1]`, of catching a Pokemon with the given base experience.
///
/// Falls linearly from 1.0 at zero experience to 0.2 at 650.
pub fn catch_probability(base_experience: u32) -> f64 {
    let ratio = f64::from(base_experience) / MAX_BASE_EXPERIENCE;
    (1.0 - ratio * 0.8).clamp(0.0, 1.0)
}

/// A caught Pokemon and when it was caught.
#[derive(Debug, Clone)]
pub struct CaughtPokemon {
    pub pokemon: Pokemon,
    pub caught_at: DateTime<Utc>,
}

/// Pokemon caught this session, keyed and listed by name.
#[derive(Debug, Default)]
pub struct Pokedex {
    entries: BTreeMap<String, CaughtPokemon>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a catch. Catching the same Pokemon again refreshes its entry.
    pub fn record(&mut self, pokemon: Pokemon) {
        let caught = CaughtPokemon {
            pokemon,
            caught_at: Utc::now(),
        };
        self.entries.insert(caught.pokemon.name.clone(), caught);
    }

    /// Looks up a caught Pokemon by name.
    pub fn get(&self, name: &str) -> Option<&CaughtPokemon> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaughtPokemon> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemon(name: &str) -> Pokemon {
        Pokemon {
            id: 1,
            name: name.to_string(),
            base_experience: Some(64),
            height: 7,
            weight: 69,
            stats: Vec::new(),
            types: Vec::new(),
        }
    }

    #[test]
    fn test_catch_probability_bounds() {
        assert_eq!(catch_probability(0), 1.0);
        assert!((catch_probability(650) - 0.2).abs() < 1e-9);
        // Clamped for absurd values
        assert_eq!(catch_probability(10_000), 0.0);
    }

    #[test]
    fn test_catch_probability_decreases() {
        assert!(catch_probability(50) > catch_probability(300));
    }

    #[test]
    fn test_pokedex_lists_by_name() {
        let mut pokedex = Pokedex::new();
        pokedex.record(pokemon("squirtle"));
        pokedex.record(pokemon("bulbasaur"));
        pokedex.record(pokemon("squirtle"));

        let names: Vec<_> = pokedex.iter().map(|c| c.pokemon.name.as_str()).collect();
        assert_eq!(names, vec!["bulbasaur", "squirtle"]);
        assert_eq!(pokedex.len(), 2);
        assert!(pokedex.get("bulbasaur").is_some());
        assert!(pokedex.get("mew").is_none());
    }
}

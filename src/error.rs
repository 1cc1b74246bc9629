//! Error types for the Pokedex
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the time-expiring cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store could not be reached.
    ///
    /// Reserved for non in-memory stores; the in-memory store never raises it.
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    /// The expiration interval must be greater than zero
    #[error("Cache interval must be greater than zero")]
    InvalidInterval,

    /// No tokio runtime is available to host the reaper task
    #[error("No async runtime available to run the cache reaper")]
    RuntimeUnavailable,
}

/// Convenience Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// == Pokedex Error Enum ==
/// Errors surfaced to the user by the fetcher and the command layer.
#[derive(Error, Debug)]
pub enum PokedexError {
    /// Cache layer failure
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Transport-level HTTP failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("Response failed with status code: {status} ({url})")]
    Status { status: u16, url: String },

    /// Payload could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Writing command output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown command name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Command needs an argument that was not given
    #[error("Usage: {command} <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// `mapb` called while on the first page
    #[error("You're on the first page")]
    NoPreviousPage,

    /// `map` called after the last page
    #[error("You're on the last page")]
    NoNextPage,

    /// `inspect` called for a Pokemon that is not in the pokedex
    #[error("You have not caught {0}")]
    NotCaught(String),
}

// == Result Type Alias ==
/// Convenience Result type for the Pokedex.
pub type Result<T> = std::result::Result<T, PokedexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = PokedexError::Status {
            status: 404,
            url: "https://pokeapi.co/api/v2/pokemon/missingno".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("missingno"));
    }

    #[test]
    fn test_missing_argument_message() {
        let err = PokedexError::MissingArgument {
            command: "catch",
            argument: "pokemon",
        };
        assert_eq!(err.to_string(), "Usage: catch <pokemon>");
    }

    #[test]
    fn test_cache_error_is_transparent() {
        let err: PokedexError = CacheError::StoreUnavailable("disk offline".to_string()).into();
        assert_eq!(err.to_string(), "Cache store unavailable: disk offline");
    }
}

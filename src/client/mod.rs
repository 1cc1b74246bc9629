//! Client Module
//!
//! Read-through access to the remote catalog: every response is looked up in
//! the cache first and stored there after a successful fetch.

mod fetcher;

pub use fetcher::PokeClient;

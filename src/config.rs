//! Configuration Module
//!
//! Handles loading and managing explorer configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default PokeAPI endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Explorer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote catalog, always ending in `/`
    pub api_base_url: String,
    /// Cache expiration threshold and sweep period in seconds
    pub cache_interval: u64,
    /// HTTP request timeout in seconds
    pub http_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Catalog endpoint (default: https://pokeapi.co/api/v2/)
    /// - `CACHE_INTERVAL` - Cache expiration interval in seconds (default: 60)
    /// - `HTTP_TIMEOUT` - Request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| normalize_base_url(&v))
                .unwrap_or(defaults.api_base_url),
            cache_interval: env::var("CACHE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs: &u64| secs > 0)
                .unwrap_or(defaults.cache_interval),
            http_timeout: env::var("HTTP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs: &u64| secs > 0)
                .unwrap_or(defaults.http_timeout),
        }
    }

    /// Cache interval as a Duration.
    pub fn cache_interval(&self) -> Duration {
        Duration::from_secs(self.cache_interval)
    }

    /// HTTP timeout as a Duration.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_interval: 60,
            http_timeout: 10,
        }
    }
}

/// Ensures the base URL ends with a single `/` so joined paths stay canonical.
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://pokeapi.co/api/v2/");
        assert_eq!(config.cache_interval, 60);
        assert_eq!(config.http_timeout, 10);
        assert_eq!(config.cache_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("API_BASE_URL");
        env::remove_var("CACHE_INTERVAL");
        env::remove_var("HTTP_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.cache_interval, 60);
        assert_eq!(config.http_timeout, 10);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8080/api"),
            "http://localhost:8080/api/"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/api//"),
            "http://localhost:8080/api/"
        );
        assert_eq!(
            normalize_base_url(" https://pokeapi.co/api/v2/ "),
            "https://pokeapi.co/api/v2/"
        );
    }
}

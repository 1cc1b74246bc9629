//! PokeAPI fetcher
//!
//! Builds canonical resource URLs and resolves them through the cache.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::cache::Cache;
use crate::config::{normalize_base_url, Config};
use crate::error::{PokedexError, Result};
use crate::models::{LocationArea, LocationAreaPage, Pokemon};

/// HTTP client for the catalog, backed by a shared [`Cache`].
///
/// Cache keys are the full request URLs, so identical requests share a slot.
#[derive(Debug, Clone)]
pub struct PokeClient {
    http: reqwest::Client,
    cache: Cache,
    base_url: String,
}

impl PokeClient {
    /// Creates a client for `config.api_base_url` that reads through `cache`.
    pub fn new(config: &Config, cache: Cache) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            http,
            cache,
            base_url: normalize_base_url(&config.api_base_url),
        })
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == URL Builders ==
    /// First page of the location area listing.
    pub fn location_areas_url(&self) -> String {
        format!("{}location-area/", self.base_url)
    }

    pub fn location_area_url(&self, name: &str) -> String {
        format!("{}location-area/{}/", self.base_url, name)
    }

    pub fn pokemon_url(&self, name: &str) -> String {
        format!("{}pokemon/{}", self.base_url, name)
    }

    // == Fetch ==
    /// Resolves `url` from the cache, falling back to a GET request.
    ///
    /// Only bodies that decode as `T` are cached.
    #[instrument(skip(self))]
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        if let Some(bytes) = self.cache.get(url)? {
            debug!("Cache hit");
            return Ok(serde_json::from_slice(&bytes)?);
        }

        debug!("Cache miss, fetching from remote");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PokedexError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let data = serde_json::from_slice(&body)?;
        self.cache.add(url, body.to_vec())?;
        Ok(data)
    }

    /// Fetches a location area listing page by its absolute URL.
    pub async fn location_areas(&self, page_url: &str) -> Result<LocationAreaPage> {
        self.fetch(page_url).await
    }

    pub async fn location_area(&self, name: &str) -> Result<LocationArea> {
        self.fetch(&self.location_area_url(name)).await
    }

    pub async fn pokemon(&self, name: &str) -> Result<Pokemon> {
        self.fetch(&self.pokemon_url(name)).await
    }
}

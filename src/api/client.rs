//! PokeAPI Client
//!
//! Fetches JSON resources, serving repeat requests from the [`Cache`].

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{PokedexError, Result};
use crate::models::{LocationArea, LocationAreaPage, Pokemon};

/// HTTP client for PokeAPI backed by a shared response cache.
///
/// Bodies are cached under their full request URL before they are decoded.
#[derive(Debug, Clone)]
pub struct PokeClient {
    http: reqwest::Client,
    base_url: String,
    cache: Cache,
}

impl PokeClient {
    /// Builds a client for `config.api_base_url` using `cache` for responses.
    pub fn new(config: &Config, cache: Cache) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("pokedex_cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// URL of the first page of location areas.
    pub fn location_areas_url(&self) -> String {
        format!("{}/location-area", self.base_url)
    }

    /// Fetches a page of location areas, the first one when `page_url` is None.
    pub async fn location_areas(&self, page_url: Option<&str>) -> Result<LocationAreaPage> {
        match page_url {
            Some(url) => self.fetch(url).await,
            None => self.fetch(&self.location_areas_url()).await,
        }
    }

    pub async fn location_area(&self, name: &str) -> Result<LocationArea> {
        let url = format!("{}/location-area/{}", self.base_url, name);
        self.fetch(&url).await
    }

    pub async fn pokemon(&self, name: &str) -> Result<Pokemon> {
        let url = format!("{}/pokemon/{}", self.base_url, name);
        self.fetch(&url).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch_body(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Returns the raw body for `url`, from the cache when it is still fresh.
    #[instrument(skip(self))]
    async fn fetch_body(&self, url: &str) -> Result<Bytes> {
        if let Some(body) = self.cache.get(url) {
            debug!(bytes = body.len(), "Cache hit");
            return Ok(body);
        }

        debug!("Cache miss, requesting");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PokedexError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        self.cache.add(url, body.clone());
        debug!(bytes = body.len(), "Cached response");

        Ok(body)
    }
}

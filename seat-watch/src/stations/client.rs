//! RegioJet locations client.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::domain::StationId;
use crate::regiojet::{Country, DEFAULT_BASE_URL, DEFAULT_CURRENCY, convert_locations};

use super::error::StationError;

/// Configuration for the locations client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Currency sent in the `X-Currency` header
    pub currency: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationClientConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StationClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the `/consts/locations` endpoint.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
}

impl StationClient {
    /// Create a new locations client.
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let mut headers = HeaderMap::new();
        let currency = HeaderValue::from_str(&config.currency)
            .map_err(|_| StationError::Config(format!("invalid currency {:?}", config.currency)))?;
        headers.insert("X-Currency", currency);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every train station with its display name.
    pub async fn fetch_all(&self) -> Result<HashMap<StationId, String>, StationError> {
        let url = format!("{}/consts/locations", self.base_url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let countries: Vec<Country> =
            serde_json::from_str(&body).map_err(|e| StationError::Json {
                message: e.to_string(),
            })?;

        let names = convert_locations(&countries);
        if names.is_empty() {
            return Err(StationError::NoStations);
        }

        Ok(names)
    }
}

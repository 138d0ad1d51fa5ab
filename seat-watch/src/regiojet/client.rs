//! RegioJet HTTP client.
//!
//! Provides async methods for querying the public RegioJet REST API.
//! Handles the currency header, concurrency limiting, and conversion to
//! domain types.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::domain::{
    RouteDetails, RouteId, RouteOffer, StationId, Stop, VehicleSeats, format_api_date,
};

use super::convert::{convert_details, convert_search, convert_timetable, merge_vehicle_seats};
use super::error::UpstreamError;
use super::types::{
    ApiMessage, FreeSeatsRequest, FreeSeatsSection, FreeSeatsSectionRequest, RouteDetailsResponse,
    SimpleRouteSearch, TimetableResponse,
};

/// Default base URL for the RegioJet public API.
pub const DEFAULT_BASE_URL: &str = "https://brn-ybus-pubapi.sa.cz/restapi";

/// Default currency for prices.
pub const DEFAULT_CURRENCY: &str = "CZK";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Seat classes queried for the per-carriage seat map.
const SEAT_CLASSES: [&str; 3] = ["C0", "C1", "C2"];

/// How much of an unparseable body to keep in errors.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the RegioJet client.
#[derive(Debug, Clone)]
pub struct RegioJetConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Currency sent in the `X-Currency` header
    pub currency: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RegioJetConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the price currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RegioJetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// RegioJet API client.
///
/// Uses a semaphore to limit concurrent requests: one discovery run can fan
/// out into many leg probes, and the API rate-limits aggressively.
#[derive(Debug, Clone)]
pub struct RegioJetClient {
    http: reqwest::Client,
    base_url: String,
    currency: String,
    semaphore: Arc<Semaphore>,
}

impl RegioJetClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RegioJetConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();

        let currency = HeaderValue::from_str(&config.currency).map_err(|_| {
            UpstreamError::InvalidRequest(format!("invalid currency: {}", config.currency))
        })?;
        headers.insert("X-Currency", currency);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            currency: config.currency,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Returns the currency prices are quoted in.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Search direct routes between two stations on a date.
    ///
    /// Bus offers, offers on other days and offers with more than one
    /// transfer are dropped.
    pub async fn search_routes(
        &self,
        from: StationId,
        to: StationId,
        date: NaiveDate,
    ) -> Result<Vec<RouteOffer>, UpstreamError> {
        let query = [
            ("fromLocationId", from.to_string()),
            ("fromLocationType", "STATION".to_string()),
            ("toLocationId", to.to_string()),
            ("toLocationType", "STATION".to_string()),
            ("departureDate", format_api_date(date)),
        ];

        let body = self.get("/routes/search/simple", &query).await?;
        let search: SimpleRouteSearch = decode(&body)?;
        let offers = convert_search(&search, date);

        trace!(%from, %to, %date, offers = offers.len(), "route search");
        Ok(offers)
    }

    /// Fetch authoritative details (free seats, prices, times) for a route
    /// between two of its stations.
    pub async fn route_details(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
    ) -> Result<RouteDetails, UpstreamError> {
        let query = [
            ("fromStationId", from.to_string()),
            ("toStationId", to.to_string()),
        ];

        let body = self.get(&format!("/routes/{route}/simple"), &query).await?;
        let dto: RouteDetailsResponse = decode(&body)?;
        Ok(convert_details(&dto)?)
    }

    /// Fetch free seats per carriage, merged over all seat classes.
    ///
    /// A seat class the route doesn't offer answers with an error message
    /// instead of a seat map; such classes contribute nothing.
    pub async fn free_seats(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
    ) -> Result<Vec<VehicleSeats>, UpstreamError> {
        let path = format!("/routes/{route}/freeSeats");
        let mut sections: Vec<FreeSeatsSection> = Vec::new();

        for seat_class in SEAT_CLASSES {
            let request = FreeSeatsRequest {
                sections: vec![FreeSeatsSectionRequest {
                    section_id: route.get(),
                    from_station_id: from.get(),
                    to_station_id: to.get(),
                }],
                tariffs: vec!["REGULAR".to_string()],
                seat_class: seat_class.to_string(),
            };

            let body = self.post(&path, &request).await?;

            match serde_json::from_str::<Vec<FreeSeatsSection>>(&body) {
                Ok(mut parsed) => sections.append(&mut parsed),
                Err(e) => match serde_json::from_str::<ApiMessage>(&body) {
                    Ok(msg) => {
                        debug!(%route, seat_class, message = %msg.message, "seat class unavailable");
                    }
                    Err(_) => {
                        return Err(UpstreamError::Json {
                            message: e.to_string(),
                            body: Some(excerpt(&body)),
                        });
                    }
                },
            }
        }

        Ok(merge_vehicle_seats(&sections))
    }

    /// Fetch a route's timetable as stops ordered by sequence.
    pub async fn timetable(&self, route: RouteId) -> Result<Vec<Stop>, UpstreamError> {
        let body = self.get(&format!("/consts/timetables/{route}"), &[]).await?;
        let dto: TimetableResponse = decode(&body)?;
        Ok(convert_timetable(&dto)?)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, UpstreamError> {
        let _permit = self.permit().await?;
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;
        read_body(response).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, UpstreamError> {
        let _permit = self.permit().await?;
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await?;
        read_body(response).await
    }

    async fn permit(&self) -> Result<tokio::sync::SemaphorePermit<'_>, UpstreamError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| UpstreamError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })
    }
}

/// Check the status and read the body of a response.
async fn read_body(response: reqwest::Response) -> Result<String, UpstreamError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(UpstreamError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response.text().await?)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|e| UpstreamError::Json {
        message: e.to_string(),
        body: Some(excerpt(body)),
    })
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

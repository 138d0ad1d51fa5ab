//! Data transfer objects for web requests and responses.
//!
//! Field names follow the public API of the watchdog service
//! (`stationFromID`, `webhookURL`, ...).

use serde::{Deserialize, Serialize};

use crate::domain::RouteOffer;

/// Query for `GET /routes`.
#[derive(Debug, Deserialize)]
pub struct RoutesQuery {
    #[serde(rename = "stationFromID")]
    pub station_from_id: String,

    #[serde(rename = "stationToID")]
    pub station_to_id: String,

    /// "DD.MM.YYYY" or "YYYY-MM-DD"
    #[serde(rename = "departureDate")]
    pub departure_date: String,
}

/// Query for `GET /allSegments`.
#[derive(Debug, Deserialize)]
pub struct SegmentsQuery {
    #[serde(rename = "stationFromID")]
    pub station_from_id: String,

    #[serde(rename = "stationToID")]
    pub station_to_id: String,

    #[serde(rename = "routeID")]
    pub route_id: String,

    /// "DD.MM.YYYY" or "YYYY-MM-DD"
    #[serde(rename = "departureDate")]
    pub departure_date: String,
}

/// Body of `POST /watchdog`.
#[derive(Debug, Deserialize)]
pub struct WatchdogRequest {
    #[serde(rename = "stationFromID")]
    pub station_from_id: String,

    #[serde(rename = "stationToID")]
    pub station_to_id: String,

    #[serde(rename = "routeID")]
    pub route_id: String,

    /// Where notifications are posted
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
}

/// Response to a stored watch.
#[derive(Debug, Serialize, Deserialize)]
pub struct WatchdogResponse {
    pub message: String,

    /// Store key of the new watch
    pub key: String,
}

/// A bookable connection in `GET /routes`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferResult {
    pub id: i64,

    /// RFC 3339 with the local offset
    pub departure_time: String,

    /// RFC 3339 with the local offset
    pub arrival_time: String,

    pub free_seats_count: u32,

    pub price_from: f64,

    pub price_to: f64,

    pub travel_time: Option<String>,
}

impl OfferResult {
    pub fn from_offer(offer: &RouteOffer) -> Self {
        Self {
            id: offer.route.get(),
            departure_time: offer.departure.to_rfc3339(),
            arrival_time: offer.arrival.to_rfc3339(),
            free_seats_count: offer.free_seats,
            price_from: offer.price_from,
            price_to: offer.price_to,
            travel_time: offer.travel_time.clone(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

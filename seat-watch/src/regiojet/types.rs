//! RegioJet API response DTOs.
//!
//! These types map directly to the public REST API's JSON. They use
//! `Option` and `#[serde(default)]` liberally because the API omits fields
//! rather than sending nulls, and the same field is sometimes a string and
//! sometimes a number.

use serde::{Deserialize, Serialize};

/// An identifier the API sends either as a JSON string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Number(i64),
    Text(String),
}

impl FlexibleId {
    /// Returns the id as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FlexibleId::Number(n) => Some(*n),
            FlexibleId::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Response from `GET /routes/search/simple`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleRouteSearch {
    #[serde(default)]
    pub routes: Vec<SimpleRoute>,
}

/// One route in a search result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRoute {
    pub id: FlexibleId,

    /// RFC 3339 departure timestamp with local offset.
    pub departure_time: String,

    /// RFC 3339 arrival timestamp with local offset.
    pub arrival_time: String,

    #[serde(default)]
    pub free_seats_count: i64,

    #[serde(default)]
    pub price_from: f64,

    #[serde(default)]
    pub price_to: f64,

    pub travel_time: Option<String>,

    /// Vehicle kinds along the route, e.g. `["TRAIN"]` or `["BUS"]`.
    #[serde(default)]
    pub vehicle_types: Vec<String>,

    #[serde(default)]
    pub transfers_count: u32,
}

/// Response from `GET /routes/{id}/simple`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDetailsResponse {
    #[serde(default)]
    pub price_from: f64,

    #[serde(default)]
    pub price_to: f64,

    #[serde(default)]
    pub free_seats_count: i64,

    #[serde(default)]
    pub departure_city_name: String,

    #[serde(default)]
    pub arrival_city_name: String,

    pub departure_time: Option<String>,

    pub arrival_time: Option<String>,

    #[serde(default)]
    pub sections: Vec<RouteSection>,
}

/// A section of a route (one vehicle run).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSection {
    pub travel_time: Option<String>,
}

/// Request body for `POST /routes/{id}/freeSeats`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSeatsRequest {
    pub sections: Vec<FreeSeatsSectionRequest>,
    pub tariffs: Vec<String>,
    pub seat_class: String,
}

/// Section selector inside a free-seat request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSeatsSectionRequest {
    pub section_id: i64,
    pub from_station_id: i64,
    pub to_station_id: i64,
}

/// One section of the free-seat response (the response is a JSON array).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSeatsSection {
    pub section_id: i64,

    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

/// A carriage with its free seats.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub free_seats: Vec<FreeSeat>,

    #[serde(default)]
    pub seat_classes: Vec<String>,

    pub vehicle_number: i64,
}

/// A single free seat.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSeat {
    pub index: i64,
    pub seat_class: Option<String>,
}

/// Error body returned by some endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Response from `GET /consts/timetables/{routeId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableResponse {
    #[serde(default)]
    pub stations: Vec<TimetableStation>,
}

/// One stop in a timetable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableStation {
    pub station_id: i64,

    /// Position along the route.
    pub index: u32,

    /// Local departure as "HH:MM:SS.fff"; absent at the terminus.
    pub departure: Option<String>,

    /// Local arrival as "HH:MM:SS.fff"; absent at the origin.
    pub arrival: Option<String>,
}

/// A country in `GET /consts/locations`.
#[derive(Debug, Clone, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub cities: Vec<City>,
}

/// A city with its stations.
#[derive(Debug, Clone, Deserialize)]
pub struct City {
    #[serde(default)]
    pub stations: Vec<LocationStation>,
}

/// A station in the locations list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStation {
    pub id: i64,

    pub fullname: String,

    #[serde(default)]
    pub stations_types: Vec<String>,
}

//! Route offers and details as reported by the availability source.

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::RouteId;

/// One bookable connection between two stations on a date.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOffer {
    /// Route to book
    pub route: RouteId,
    /// Departure instant with the local offset
    pub departure: DateTime<FixedOffset>,
    /// Arrival instant with the local offset
    pub arrival: DateTime<FixedOffset>,
    /// Free seats as listed in the search (not authoritative)
    pub free_seats: u32,
    /// Lowest fare
    pub price_from: f64,
    /// Highest fare
    pub price_to: f64,
    /// Travel time as displayed upstream (e.g. "02:31 h")
    pub travel_time: Option<String>,
}

/// Authoritative details for a route between two of its stations.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDetails {
    /// Lowest fare
    pub price_from: f64,
    /// Highest fare
    pub price_to: f64,
    /// Authoritative free seat count
    pub free_seats: u32,
    /// Display name of the departure city
    pub departure_city: String,
    /// Display name of the arrival city
    pub arrival_city: String,
    /// Travel time of the first section
    pub travel_time: String,
    /// Departure instant, if readable
    pub departure: Option<DateTime<FixedOffset>>,
    /// Arrival instant, if readable
    pub arrival: Option<DateTime<FixedOffset>>,
}

impl RouteDetails {
    /// Local calendar date of departure.
    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure.map(|dt| dt.date_naive())
    }
}

/// Free seats in one carriage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSeats {
    /// Carriage number as signed on the train
    pub vehicle_number: i64,
    /// Number of free seats across all seat classes
    pub free_seats: usize,
}

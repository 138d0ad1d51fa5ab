//! Scriptable in-memory upstream for testing without API access.
//!
//! Serves timetables, offers and route details from maps filled in by the
//! caller, and can be told to fail specific lookups.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use tokio::sync::RwLock;

use crate::domain::{RouteDetails, RouteId, RouteOffer, StationId, Stop, VehicleSeats};
use crate::planner::{SeatOracle, TimetableSource};

use super::error::UpstreamError;

/// Local offset used for scripted timestamps (Central European Time).
const CET_OFFSET_SECS: i32 = 3600;

/// Scripted travel time for every leg.
const LEG_MINUTES: i64 = 30;

#[derive(Default)]
struct MockState {
    timetables: HashMap<RouteId, Vec<Stop>>,
    offers: HashMap<(StationId, StationId, NaiveDate), Vec<RouteOffer>>,
    details: HashMap<(RouteId, StationId, StationId), RouteDetails>,
    vehicles: HashMap<RouteId, Vec<VehicleSeats>>,
    failing_searches: HashSet<(StationId, StationId)>,
    failing_details: HashSet<RouteId>,
}

/// Mock upstream that serves scripted data.
///
/// Lookups with nothing scripted behave like the live API: searches return
/// no offers, and timetables or details are a 404.
#[derive(Clone, Default)]
pub struct MockUpstream {
    state: Arc<RwLock<MockState>>,
    search_calls: Arc<AtomicUsize>,
    detail_calls: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timetable for a route.
    pub async fn set_timetable(&self, route: RouteId, stops: Vec<Stop>) {
        self.state.write().await.timetables.insert(route, stops);
    }

    /// Add a raw offer to the results of a search.
    pub async fn add_offer(&self, from: StationId, to: StationId, date: NaiveDate, offer: RouteOffer) {
        self.state
            .write()
            .await
            .offers
            .entry((from, to, date))
            .or_default()
            .push(offer);
    }

    /// Set the details returned for a route between two stations.
    pub async fn set_details(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
        details: RouteDetails,
    ) {
        self.state
            .write()
            .await
            .details
            .insert((route, from, to), details);
    }

    /// Script a bookable hop: an offer departing at `departure` on `date`
    /// whose details report `free_seats` at `price`.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_leg(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
        date: NaiveDate,
        departure: NaiveTime,
        free_seats: u32,
        price: f64,
    ) {
        let Some(depart_at) = local_instant(date, departure) else {
            return;
        };
        let arrive_at = depart_at + TimeDelta::minutes(LEG_MINUTES);

        let offer = RouteOffer {
            route,
            departure: depart_at,
            arrival: arrive_at,
            free_seats,
            price_from: price,
            price_to: price,
            travel_time: Some(format!("00:{LEG_MINUTES:02} h")),
        };

        let details = RouteDetails {
            price_from: price,
            price_to: price,
            free_seats,
            departure_city: from.to_string(),
            arrival_city: to.to_string(),
            travel_time: format!("00:{LEG_MINUTES:02} h"),
            departure: Some(depart_at),
            arrival: Some(arrive_at),
        };

        self.add_offer(from, to, date, offer).await;
        self.set_details(route, from, to, details).await;
    }

    /// Set the per-carriage seats of a route.
    pub async fn set_vehicle_seats(&self, route: RouteId, seats: Vec<VehicleSeats>) {
        self.state.write().await.vehicles.insert(route, seats);
    }

    /// Make searches between two stations fail.
    pub async fn fail_search(&self, from: StationId, to: StationId) {
        self.state.write().await.failing_searches.insert((from, to));
    }

    /// Make detail lookups for a route fail.
    pub async fn fail_details(&self, route: RouteId) {
        self.state.write().await.failing_details.insert(route);
    }

    /// Number of route searches served so far.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::Relaxed)
    }

    /// Number of detail lookups served so far.
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::Relaxed)
    }
}

/// Combine a date and local time at the scripted offset.
fn local_instant(date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
    FixedOffset::east_opt(CET_OFFSET_SECS)
        .and_then(|offset| date.and_time(time).and_local_timezone(offset).single())
}

fn scripted_failure() -> UpstreamError {
    UpstreamError::Api {
        status: 503,
        message: "scripted failure".to_string(),
    }
}

fn not_found(what: &str) -> UpstreamError {
    UpstreamError::Api {
        status: 404,
        message: format!("{what} not found"),
    }
}

impl TimetableSource for MockUpstream {
    async fn stops(&self, route: RouteId) -> Result<Vec<Stop>, UpstreamError> {
        self.state
            .read()
            .await
            .timetables
            .get(&route)
            .cloned()
            .ok_or_else(|| not_found("timetable"))
    }
}

impl SeatOracle for MockUpstream {
    async fn search_routes(
        &self,
        from: StationId,
        to: StationId,
        date: NaiveDate,
    ) -> Result<Vec<RouteOffer>, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::Relaxed);
        let state = self.state.read().await;

        if state.failing_searches.contains(&(from, to)) {
            return Err(scripted_failure());
        }

        Ok(state
            .offers
            .get(&(from, to, date))
            .cloned()
            .unwrap_or_default())
    }

    async fn route_details(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
    ) -> Result<RouteDetails, UpstreamError> {
        self.detail_calls.fetch_add(1, Ordering::Relaxed);
        let state = self.state.read().await;

        if state.failing_details.contains(&route) {
            return Err(scripted_failure());
        }

        state
            .details
            .get(&(route, from, to))
            .cloned()
            .ok_or_else(|| not_found("route"))
    }

    async fn vehicle_seats(
        &self,
        route: RouteId,
        _from: StationId,
        _to: StationId,
    ) -> Result<Vec<VehicleSeats>, UpstreamError> {
        Ok(self
            .state
            .read()
            .await
            .vehicles
            .get(&route)
            .cloned()
            .unwrap_or_default())
    }
}

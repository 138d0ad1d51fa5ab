//! Collaborators the planner reads route data from.
//!
//! These abstractions allow the planner and scanner to be tested with
//! scripted data instead of the live API.

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{RouteDetails, RouteId, RouteOffer, StationId, Stop, VehicleSeats};
use crate::regiojet::{RegioJetClient, UpstreamError};

/// Source of route timetables.
pub trait TimetableSource: Send + Sync {
    /// Get a route's stops ordered by sequence.
    fn stops(&self, route: RouteId) -> impl Future<Output = Result<Vec<Stop>, UpstreamError>> + Send;
}

/// Source of seat availability between two stations.
pub trait SeatOracle: Send + Sync {
    /// Direct offers between two stations departing on `date`.
    fn search_routes(
        &self,
        from: StationId,
        to: StationId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<RouteOffer>, UpstreamError>> + Send;

    /// Authoritative details for a route between two of its stations.
    fn route_details(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
    ) -> impl Future<Output = Result<RouteDetails, UpstreamError>> + Send;

    /// Free seats per carriage.
    fn vehicle_seats(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
    ) -> impl Future<Output = Result<Vec<VehicleSeats>, UpstreamError>> + Send;
}

impl TimetableSource for RegioJetClient {
    async fn stops(&self, route: RouteId) -> Result<Vec<Stop>, UpstreamError> {
        self.timetable(route).await
    }
}

impl SeatOracle for RegioJetClient {
    async fn search_routes(
        &self,
        from: StationId,
        to: StationId,
        date: NaiveDate,
    ) -> Result<Vec<RouteOffer>, UpstreamError> {
        RegioJetClient::search_routes(self, from, to, date).await
    }

    async fn route_details(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
    ) -> Result<RouteDetails, UpstreamError> {
        RegioJetClient::route_details(self, route, from, to).await
    }

    async fn vehicle_seats(
        &self,
        route: RouteId,
        from: StationId,
        to: StationId,
    ) -> Result<Vec<VehicleSeats>, UpstreamError> {
        self.free_seats(route, from, to).await
    }
}

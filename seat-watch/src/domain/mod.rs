//! Domain types for the seat watchdog.
//!
//! This module contains the core domain model types that represent
//! validated route data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod error;
mod itinerary;
mod leg;
mod offer;
mod station;
mod stop;
mod time;
mod watch;

pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::{Leg, SeatAvailability};
pub use offer::{RouteDetails, RouteOffer, VehicleSeats};
pub use station::{InvalidId, RouteId, StationId};
pub use stop::Stop;
pub use time::{
    TimeError, format_api_date, format_date, format_hhmm, local_clock, parse_clock, parse_date,
    parse_timestamp, same_minute,
};
pub use watch::Watch;

//! Conversion from RegioJet DTOs to domain types.
//!
//! Bad records are logged and skipped rather than failing a whole response:
//! one unreadable offer must not hide the others.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{
    RouteDetails, RouteId, RouteOffer, StationId, Stop, VehicleSeats, parse_clock,
    parse_timestamp,
};

use super::types::{
    Country, FreeSeatsSection, RouteDetailsResponse, SimpleRoute, SimpleRouteSearch,
    TimetableResponse,
};

/// Offers with more transfers than this are not treated as direct hops.
const MAX_TRANSFERS: u32 = 1;

/// Station type kept in the name lookup.
const TRAIN_STATION: &str = "TRAIN_STATION";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Route details without any section
    #[error("no sections available in the response")]
    NoSections,

    /// Timetable without any stop
    #[error("no timetable available in the response")]
    EmptyTimetable,

    /// Invalid field value
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

/// Convert a route search response into offers departing on `date`.
///
/// Drops bus-operated offers, offers departing on another day, offers with
/// more than one transfer, and offers whose ids or times are unreadable.
pub fn convert_search(search: &SimpleRouteSearch, date: NaiveDate) -> Vec<RouteOffer> {
    search
        .routes
        .iter()
        .filter_map(|route| match convert_offer(route, date) {
            Ok(offer) => offer,
            Err(e) => {
                warn!(error = %e, "skipping unreadable route offer");
                None
            }
        })
        .collect()
}

/// Convert one offer; `Ok(None)` means it was filtered out deliberately.
fn convert_offer(
    route: &SimpleRoute,
    date: NaiveDate,
) -> Result<Option<RouteOffer>, ConversionError> {
    if route.vehicle_types.first().is_some_and(|v| v == "BUS") {
        debug!("dropping bus offer");
        return Ok(None);
    }

    if route.transfers_count > MAX_TRANSFERS {
        debug!(transfers = route.transfers_count, "dropping offer with transfers");
        return Ok(None);
    }

    let departure =
        parse_timestamp(&route.departure_time).map_err(|e| ConversionError::InvalidField {
            field: "departureTime",
            message: e.to_string(),
        })?;

    if departure.date_naive() != date {
        return Ok(None);
    }

    let arrival =
        parse_timestamp(&route.arrival_time).map_err(|e| ConversionError::InvalidField {
            field: "arrivalTime",
            message: e.to_string(),
        })?;

    let route_id = route
        .id
        .as_i64()
        .and_then(|raw| RouteId::from_raw(raw).ok())
        .ok_or_else(|| ConversionError::InvalidField {
            field: "id",
            message: format!("{:?}", route.id),
        })?;

    Ok(Some(RouteOffer {
        route: route_id,
        departure,
        arrival,
        free_seats: clamp_seats(route.free_seats_count),
        price_from: route.price_from,
        price_to: route.price_to,
        travel_time: route.travel_time.clone(),
    }))
}

/// Convert route details.
///
/// Unreadable timestamps become `None`; a response without sections is
/// rejected, since it describes no bookable run.
pub fn convert_details(dto: &RouteDetailsResponse) -> Result<RouteDetails, ConversionError> {
    let first = dto.sections.first().ok_or(ConversionError::NoSections)?;

    let departure = dto.departure_time.as_deref().and_then(|s| {
        parse_timestamp(s)
            .inspect_err(|e| warn!(value = s, error = %e, "unreadable departure time"))
            .ok()
    });
    let arrival = dto.arrival_time.as_deref().and_then(|s| {
        parse_timestamp(s)
            .inspect_err(|e| warn!(value = s, error = %e, "unreadable arrival time"))
            .ok()
    });

    Ok(RouteDetails {
        price_from: dto.price_from,
        price_to: dto.price_to,
        free_seats: clamp_seats(dto.free_seats_count),
        departure_city: dto.departure_city_name.clone(),
        arrival_city: dto.arrival_city_name.clone(),
        travel_time: first.travel_time.clone().unwrap_or_default(),
        departure,
        arrival,
    })
}

/// Convert a timetable into stops ordered by sequence.
pub fn convert_timetable(dto: &TimetableResponse) -> Result<Vec<Stop>, ConversionError> {
    if dto.stations.is_empty() {
        return Err(ConversionError::EmptyTimetable);
    }

    let mut stops: Vec<Stop> = dto
        .stations
        .iter()
        .filter_map(|s| {
            let station = match StationId::from_raw(s.station_id) {
                Ok(id) => id,
                Err(e) => {
                    warn!(station = s.station_id, error = %e, "skipping timetable stop");
                    return None;
                }
            };

            let departure = s.departure.as_deref().and_then(|d| {
                parse_clock(d)
                    .inspect_err(|e| warn!(%station, value = d, error = %e, "unreadable departure"))
                    .ok()
            });

            Some(Stop::new(station, s.index, departure))
        })
        .collect();

    if stops.is_empty() {
        return Err(ConversionError::EmptyTimetable);
    }

    stops.sort_by_key(|s| s.sequence);
    Ok(stops)
}

/// Merge free-seat responses (one per seat class) into per-carriage counts.
///
/// Carriages are returned in ascending number order.
pub fn merge_vehicle_seats(sections: &[FreeSeatsSection]) -> Vec<VehicleSeats> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

    for section in sections {
        for vehicle in &section.vehicles {
            *counts.entry(vehicle.vehicle_number).or_default() += vehicle.free_seats.len();
        }
    }

    counts
        .into_iter()
        .map(|(vehicle_number, free_seats)| VehicleSeats {
            vehicle_number,
            free_seats,
        })
        .collect()
}

/// Build the station id → name map, keeping train stations only.
pub fn convert_locations(countries: &[Country]) -> HashMap<StationId, String> {
    countries
        .iter()
        .flat_map(|country| &country.cities)
        .flat_map(|city| &city.stations)
        .filter(|s| s.stations_types.iter().any(|t| t == TRAIN_STATION))
        .filter_map(|s| {
            StationId::from_raw(s.id)
                .ok()
                .map(|id| (id, s.fullname.clone()))
        })
        .collect()
}

/// Negative counts have been seen upstream; treat them as sold out.
fn clamp_seats(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

//! Rendering itineraries for display.
//!
//! A leg that can't be rendered (unknown station, unreadable time) is left
//! out and recorded; the rest of the itinerary is still shown.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::{Itinerary, Leg, StationId, format_date, format_hhmm};

/// Why a leg was left out of a rendered itinerary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderSkip {
    /// A station has no display name
    #[error("leg {leg}: no name for station {station}")]
    UnknownStation { leg: usize, station: StationId },

    /// A departure or arrival time is unknown
    #[error("leg {leg}: no {which} time")]
    MissingTime { leg: usize, which: &'static str },
}

/// One leg ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegView {
    /// Boarding station name
    pub from: String,
    /// Alighting station name
    pub to: String,
    /// Departure as "HH:MM"
    pub departure: String,
    /// Arrival as "HH:MM"
    pub arrival: String,
    pub free_seats: u32,
    /// Fare with two decimals
    pub price: String,
}

/// An itinerary ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryView {
    pub legs: Vec<LegView>,
    /// Sum of all leg fares with two decimals, including skipped legs
    pub total_price: String,
    /// Travel date as "DD.MM.YYYY"
    pub departure_date: String,
    /// Number of legs in the itinerary, including skipped legs
    pub leg_count: usize,
    /// Seat changes along the way
    pub changes: usize,
    /// Fewest free seats on any leg; how many can travel the whole way
    pub min_free_seats: u32,
    /// Legs that could not be rendered
    #[serde(skip)]
    pub skipped: Vec<RenderSkip>,
}

/// Format an amount with two decimals.
pub fn format_price(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Render an itinerary using a station name lookup.
///
/// The first leg's departure is the origin stop's scheduled departure,
/// which is the time the traveller asked about, rather than the departure
/// reported for the hop.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use chrono::{NaiveDate, NaiveTime};
/// use seat_watch::domain::{Itinerary, Leg, RouteId, SeatAvailability, StationId, Stop};
/// use seat_watch::notify::render_itinerary;
///
/// let prague = StationId::parse("1").unwrap();
/// let pardubice = StationId::parse("2").unwrap();
/// let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
/// let eleven = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
///
/// let leg = Leg::new(
///     Stop::new(prague, 0, Some(ten)),
///     Stop::new(pardubice, 1, None),
///     NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
///     SeatAvailability {
///         route: RouteId::parse("7").unwrap(),
///         free_seats: 3,
///         price: 149.0,
///         departure: Some(ten),
///         arrival: Some(eleven),
///     },
/// )
/// .unwrap();
/// let itinerary = Itinerary::new(vec![leg]).unwrap();
///
/// let names = HashMap::from([
///     (prague, "Praha hl.n.".to_string()),
///     (pardubice, "Pardubice".to_string()),
/// ]);
///
/// let view = render_itinerary(&itinerary, &names);
/// assert_eq!(view.legs[0].departure, "10:00");
/// assert_eq!(view.total_price, "149.00");
/// assert_eq!(view.departure_date, "15.03.2024");
/// ```
pub fn render_itinerary(itinerary: &Itinerary, names: &HashMap<StationId, String>) -> ItineraryView {
    let mut legs = Vec::with_capacity(itinerary.leg_count());
    let mut skipped = Vec::new();

    for (index, leg) in itinerary.legs().iter().enumerate() {
        let departure = if index == 0 {
            itinerary.origin().scheduled_departure
        } else {
            leg.departure()
        };

        match render_leg(index, leg, departure, names) {
            Ok(view) => legs.push(view),
            Err(skip) => {
                warn!(route = %leg.route(), error = %skip, "skipping leg in rendered itinerary");
                skipped.push(skip);
            }
        }
    }

    ItineraryView {
        legs,
        total_price: format_price(itinerary.total_price()),
        departure_date: format_date(itinerary.date()),
        leg_count: itinerary.leg_count(),
        changes: itinerary.change_count(),
        min_free_seats: itinerary.bottleneck_seats(),
        skipped,
    }
}

/// Render every itinerary, keeping their order.
pub fn render_all(itineraries: &[Itinerary], names: &HashMap<StationId, String>) -> Vec<ItineraryView> {
    itineraries
        .iter()
        .map(|itinerary| render_itinerary(itinerary, names))
        .collect()
}

fn render_leg(
    index: usize,
    leg: &Leg,
    departure: Option<chrono::NaiveTime>,
    names: &HashMap<StationId, String>,
) -> Result<LegView, RenderSkip> {
    let name = |station: StationId| {
        names
            .get(&station)
            .cloned()
            .ok_or(RenderSkip::UnknownStation {
                leg: index,
                station,
            })
    };

    let from = name(leg.from_station())?;
    let to = name(leg.to_station())?;

    let departure = departure.ok_or(RenderSkip::MissingTime {
        leg: index,
        which: "departure",
    })?;
    let arrival = leg.arrival().ok_or(RenderSkip::MissingTime {
        leg: index,
        which: "arrival",
    })?;

    Ok(LegView {
        from,
        to,
        departure: format_hhmm(departure),
        arrival: format_hhmm(arrival),
        free_seats: leg.free_seats(),
        price: format_price(leg.price()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, SeatAvailability, Stop};
    use chrono::{NaiveDate, NaiveTime};

    fn station(n: i64) -> StationId {
        StationId::from_raw(n).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn names() -> HashMap<StationId, String> {
        HashMap::from([
            (station(1), "Praha hl.n.".to_string()),
            (station(2), "Kolín".to_string()),
            (station(3), "Pardubice hl.n.".to_string()),
        ])
    }

    fn leg(
        from: (i64, u32, Option<NaiveTime>),
        to: (i64, u32),
        departure: Option<NaiveTime>,
        arrival: Option<NaiveTime>,
        price: f64,
    ) -> Leg {
        Leg::new(
            Stop::new(station(from.0), from.1, from.2),
            Stop::new(station(to.0), to.1, None),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            SeatAvailability {
                route: RouteId::from_raw(9).unwrap(),
                free_seats: 4,
                price,
                departure,
                arrival,
            },
        )
        .unwrap()
    }

    #[test]
    fn renders_all_legs() {
        let itinerary = Itinerary::new(vec![
            leg((1, 0, Some(hm(10, 0))), (2, 1), Some(hm(10, 0)), Some(hm(10, 40)), 99.5),
            leg((2, 1, None), (3, 2), Some(hm(10, 42)), Some(hm(11, 5)), 50.25),
        ])
        .unwrap();

        let view = render_itinerary(&itinerary, &names());

        assert_eq!(
            view.legs,
            vec![
                LegView {
                    from: "Praha hl.n.".into(),
                    to: "Kolín".into(),
                    departure: "10:00".into(),
                    arrival: "10:40".into(),
                    free_seats: 4,
                    price: "99.50".into(),
                },
                LegView {
                    from: "Kolín".into(),
                    to: "Pardubice hl.n.".into(),
                    departure: "10:42".into(),
                    arrival: "11:05".into(),
                    free_seats: 4,
                    price: "50.25".into(),
                },
            ]
        );
        assert_eq!(view.total_price, "149.75");
        assert_eq!(view.departure_date, "05.03.2024");
        assert_eq!(view.leg_count, 2);
        assert!(view.skipped.is_empty());
        assert_eq!(view.changes, 1);
        assert_eq!(view.min_free_seats, 4);
    }

    #[test]
    fn first_departure_comes_from_origin_stop() {
        // The hop reports 10:05 but the traveller boards the 10:00.
        let itinerary = Itinerary::new(vec![leg(
            (1, 0, Some(hm(10, 0))),
            (2, 1),
            Some(hm(10, 5)),
            Some(hm(10, 40)),
            10.0,
        )])
        .unwrap();

        let view = render_itinerary(&itinerary, &names());
        assert_eq!(view.legs[0].departure, "10:00");
    }

    #[test]
    fn unknown_station_skips_only_that_leg() {
        let itinerary = Itinerary::new(vec![
            leg((1, 0, Some(hm(10, 0))), (4, 1), Some(hm(10, 0)), Some(hm(10, 40)), 10.0),
            leg((4, 1, None), (3, 2), Some(hm(10, 42)), Some(hm(11, 5)), 20.0),
        ])
        .unwrap();

        let view = render_itinerary(&itinerary, &names());

        assert!(view.legs.is_empty());
        assert_eq!(
            view.skipped,
            vec![
                RenderSkip::UnknownStation {
                    leg: 0,
                    station: station(4)
                },
                RenderSkip::UnknownStation {
                    leg: 1,
                    station: station(4)
                },
            ]
        );
        // Totals still describe the whole itinerary.
        assert_eq!(view.total_price, "30.00");
        assert_eq!(view.leg_count, 2);
    }

    #[test]
    fn missing_time_skips_leg() {
        let itinerary = Itinerary::new(vec![
            leg((1, 0, Some(hm(10, 0))), (2, 1), Some(hm(10, 0)), None, 10.0),
            leg((2, 1, None), (3, 2), Some(hm(10, 42)), Some(hm(11, 5)), 20.0),
        ])
        .unwrap();

        let view = render_itinerary(&itinerary, &names());

        assert_eq!(view.legs.len(), 1);
        assert_eq!(view.legs[0].from, "Kolín");
        assert_eq!(
            view.skipped,
            vec![RenderSkip::MissingTime {
                leg: 0,
                which: "arrival"
            }]
        );
    }

    #[test]
    fn origin_without_schedule_is_missing_departure() {
        let itinerary = Itinerary::new(vec![leg(
            (1, 0, None),
            (2, 1),
            Some(hm(10, 0)),
            Some(hm(10, 40)),
            10.0,
        )])
        .unwrap();

        let view = render_itinerary(&itinerary, &names());
        assert_eq!(
            view.skipped,
            vec![RenderSkip::MissingTime {
                leg: 0,
                which: "departure"
            }]
        );
    }

    #[test]
    fn serialises_without_skips() {
        let itinerary = Itinerary::new(vec![leg(
            (1, 0, Some(hm(10, 0))),
            (2, 1),
            Some(hm(10, 0)),
            Some(hm(10, 40)),
            10.0,
        )])
        .unwrap();

        let json = serde_json::to_value(render_itinerary(&itinerary, &names())).unwrap();

        assert_eq!(json["totalPrice"], "10.00");
        assert_eq!(json["departureDate"], "05.03.2024");
        assert_eq!(json["legs"][0]["freeSeats"], 4);
        assert_eq!(json["changes"], 0);
        assert_eq!(json["minFreeSeats"], 4);
        assert!(json.get("skipped").is_none());
    }
}

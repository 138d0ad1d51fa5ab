//! Itinerary type.
//!
//! An `Itinerary` is a complete trip from origin to destination made of
//! one or more feasible legs, changing seats at intermediate stops.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::{DomainError, Leg, StationId, Stop};

/// A chain of feasible legs forming a simple path along a route.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (`legs[i].to == legs[i + 1].from`)
/// - No station appears twice
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<Leg>,
}

impl Itinerary {
    /// Constructs an itinerary from legs in travel order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list is empty, consecutive legs don't share a
    /// stop, or any station is visited twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use seat_watch::domain::{Itinerary, Leg, RouteId, SeatAvailability, StationId, Stop};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let stop = |id: &str, seq| Stop::new(StationId::parse(id).unwrap(), seq, None);
    /// let seats = |price| SeatAvailability {
    ///     route: RouteId::parse("1").unwrap(),
    ///     free_seats: 2,
    ///     price,
    ///     departure: None,
    ///     arrival: None,
    /// };
    ///
    /// let first = Leg::new(stop("10", 0), stop("20", 1), date, seats(100.0)).unwrap();
    /// let second = Leg::new(stop("20", 1), stop("30", 2), date, seats(50.0)).unwrap();
    ///
    /// let itinerary = Itinerary::new(vec![first, second]).unwrap();
    /// assert_eq!(itinerary.leg_count(), 2);
    /// assert_eq!(itinerary.total_price(), 150.0);
    /// ```
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for pair in legs.windows(2) {
            if pair[0].to_stop() != pair[1].from_stop() {
                return Err(DomainError::NotAdjacent(
                    pair[0].to_station(),
                    pair[1].from_station(),
                ));
            }
        }

        let mut seen = HashSet::with_capacity(legs.len() + 1);
        seen.insert(legs[0].from_station());
        for leg in &legs {
            if !seen.insert(leg.to_station()) {
                return Err(DomainError::RepeatedStation(leg.to_station()));
            }
        }

        Ok(Self { legs })
    }

    /// Returns the legs in travel order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the number of seat changes (legs minus one).
    pub fn change_count(&self) -> usize {
        self.legs.len() - 1
    }

    /// Returns the first stop of the trip.
    pub fn origin(&self) -> &Stop {
        // Safe: non-empty by construction
        self.legs[0].from_stop()
    }

    /// Returns the last stop of the trip.
    pub fn destination(&self) -> &Stop {
        // Safe: non-empty by construction
        self.legs[self.legs.len() - 1].to_stop()
    }

    /// Returns the travel date of the first leg.
    pub fn date(&self) -> NaiveDate {
        self.legs[0].date()
    }

    /// Returns the sum of all leg prices.
    pub fn total_price(&self) -> f64 {
        self.legs.iter().map(Leg::price).sum()
    }

    /// Returns the stations visited, origin first.
    pub fn stations(&self) -> Vec<StationId> {
        std::iter::once(self.legs[0].from_station())
            .chain(self.legs.iter().map(Leg::to_station))
            .collect()
    }

    /// Returns the smallest free-seat count across all legs.
    pub fn bottleneck_seats(&self) -> u32 {
        self.legs.iter().map(Leg::free_seats).min().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, SeatAvailability};

    fn stop(id: &str, seq: u32) -> Stop {
        Stop::new(StationId::parse(id).unwrap(), seq, None)
    }

    fn leg(from: Stop, to: Stop, free: u32, price: f64) -> Leg {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let seats = SeatAvailability {
            route: RouteId::parse("1").unwrap(),
            free_seats: free,
            price,
            departure: None,
            arrival: None,
        };
        Leg::new(from, to, date, seats).unwrap()
    }

    #[test]
    fn single_leg_itinerary() {
        let it = Itinerary::new(vec![leg(stop("1", 0), stop("2", 1), 4, 10.0)]).unwrap();
        assert_eq!(it.leg_count(), 1);
        assert_eq!(it.change_count(), 0);
        assert_eq!(it.origin().station, StationId::parse("1").unwrap());
        assert_eq!(it.destination().station, StationId::parse("2").unwrap());
    }

    #[test]
    fn reject_empty() {
        assert_eq!(Itinerary::new(vec![]), Err(DomainError::EmptyItinerary));
    }

    #[test]
    fn reject_gap_between_legs() {
        let result = Itinerary::new(vec![
            leg(stop("1", 0), stop("2", 1), 1, 1.0),
            leg(stop("3", 2), stop("4", 3), 1, 1.0),
        ]);
        assert!(matches!(result, Err(DomainError::NotAdjacent(_, _))));
    }

    #[test]
    fn reject_repeated_station() {
        // A looping route that serves station 1 again at sequence 2.
        let result = Itinerary::new(vec![
            leg(stop("1", 0), stop("2", 1), 1, 1.0),
            leg(stop("2", 1), stop("1", 2), 1, 1.0),
        ]);
        assert_eq!(
            result,
            Err(DomainError::RepeatedStation(StationId::parse("1").unwrap()))
        );
    }

    #[test]
    fn aggregates() {
        let it = Itinerary::new(vec![
            leg(stop("1", 0), stop("2", 1), 7, 120.5),
            leg(stop("2", 1), stop("5", 4), 2, 79.5),
        ])
        .unwrap();

        assert_eq!(it.total_price(), 200.0);
        assert_eq!(it.bottleneck_seats(), 2);
        assert_eq!(
            it.stations(),
            vec![
                StationId::parse("1").unwrap(),
                StationId::parse("2").unwrap(),
                StationId::parse("5").unwrap(),
            ]
        );
    }
}

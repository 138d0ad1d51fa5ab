//! Leg type.
//!
//! A `Leg` is one feasible direct hop between two stops of a route on a
//! given date: the upstream confirmed free seats and the departure matched
//! the timetable.

use chrono::{NaiveDate, NaiveTime};

use super::{DomainError, RouteId, StationId, Stop};

/// Seat availability reported by the upstream for one hop.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatAvailability {
    /// Route that serves the hop
    pub route: RouteId,
    /// Authoritative number of free seats
    pub free_seats: u32,
    /// Lowest fare for the hop
    pub price: f64,
    /// Reported departure time of day, if it could be read
    pub departure: Option<NaiveTime>,
    /// Reported arrival time of day, if it could be read
    pub arrival: Option<NaiveTime>,
}

/// A leg of an itinerary.
///
/// # Invariants
///
/// - `from` lies strictly before `to` along the route
/// - `free_seats > 0`
/// - `price` is finite and not negative
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    from: Stop,
    to: Stop,
    date: NaiveDate,
    availability: SeatAvailability,
}

impl Leg {
    /// Construct a leg, validating direction, seats and price.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `to` does not come after `from` on the route
    /// - the availability reports no free seats
    /// - the price is negative or not finite
    ///
    /// # Examples
    ///
    /// ```
    /// use seat_watch::domain::{Leg, RouteId, SeatAvailability, StationId, Stop};
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    /// let a = Stop::new(StationId::parse("1").unwrap(), 0, Some(ten));
    /// let b = Stop::new(StationId::parse("2").unwrap(), 1, None);
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    ///
    /// let seats = SeatAvailability {
    ///     route: RouteId::parse("77").unwrap(),
    ///     free_seats: 5,
    ///     price: 149.0,
    ///     departure: Some(ten),
    ///     arrival: None,
    /// };
    ///
    /// let leg = Leg::new(a.clone(), b.clone(), date, seats.clone()).unwrap();
    /// assert_eq!(leg.free_seats(), 5);
    ///
    /// // Travelling backwards is rejected
    /// assert!(Leg::new(b, a, date, seats).is_err());
    /// ```
    pub fn new(
        from: Stop,
        to: Stop,
        date: NaiveDate,
        availability: SeatAvailability,
    ) -> Result<Self, DomainError> {
        if !from.precedes(&to) {
            return Err(DomainError::InvalidLeg(
                "destination must come after origin on the route",
            ));
        }

        if availability.free_seats == 0 {
            return Err(DomainError::InvalidLeg("no free seats"));
        }

        if !availability.price.is_finite() || availability.price < 0.0 {
            return Err(DomainError::InvalidLeg("price must be a non-negative amount"));
        }

        Ok(Self {
            from,
            to,
            date,
            availability,
        })
    }

    /// Returns the boarding stop.
    pub fn from_stop(&self) -> &Stop {
        &self.from
    }

    /// Returns the alighting stop.
    pub fn to_stop(&self) -> &Stop {
        &self.to
    }

    /// Returns the boarding station.
    pub fn from_station(&self) -> StationId {
        self.from.station
    }

    /// Returns the alighting station.
    pub fn to_station(&self) -> StationId {
        self.to.station
    }

    /// Returns the travel date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the route serving this leg.
    pub fn route(&self) -> RouteId {
        self.availability.route
    }

    /// Returns the number of free seats (always positive).
    pub fn free_seats(&self) -> u32 {
        self.availability.free_seats
    }

    /// Returns the fare for this leg.
    pub fn price(&self) -> f64 {
        self.availability.price
    }

    /// Returns the reported departure time, if known.
    pub fn departure(&self) -> Option<NaiveTime> {
        self.availability.departure
    }

    /// Returns the reported arrival time, if known.
    pub fn arrival(&self) -> Option<NaiveTime> {
        self.availability.arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, seq: u32) -> Stop {
        Stop::new(StationId::parse(id).unwrap(), seq, None)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn seats(free: u32, price: f64) -> SeatAvailability {
        SeatAvailability {
            route: RouteId::parse("9").unwrap(),
            free_seats: free,
            price,
            departure: None,
            arrival: None,
        }
    }

    #[test]
    fn leg_construction_valid() {
        let leg = Leg::new(stop("1", 0), stop("3", 2), date(), seats(3, 99.5)).unwrap();
        assert_eq!(leg.from_station(), StationId::parse("1").unwrap());
        assert_eq!(leg.to_station(), StationId::parse("3").unwrap());
        assert_eq!(leg.route(), RouteId::parse("9").unwrap());
        assert_eq!(leg.price(), 99.5);
        assert_eq!(leg.date(), date());
        assert!(leg.departure().is_none());
    }

    #[test]
    fn reject_same_or_backward_stop() {
        assert!(matches!(
            Leg::new(stop("1", 1), stop("2", 1), date(), seats(1, 1.0)),
            Err(DomainError::InvalidLeg(_))
        ));
        assert!(matches!(
            Leg::new(stop("1", 2), stop("2", 1), date(), seats(1, 1.0)),
            Err(DomainError::InvalidLeg(_))
        ));
    }

    #[test]
    fn reject_sold_out() {
        assert!(Leg::new(stop("1", 0), stop("2", 1), date(), seats(0, 1.0)).is_err());
    }

    #[test]
    fn reject_bad_price() {
        assert!(Leg::new(stop("1", 0), stop("2", 1), date(), seats(1, -1.0)).is_err());
        assert!(Leg::new(stop("1", 0), stop("2", 1), date(), seats(1, f64::NAN)).is_err());
        assert!(Leg::new(stop("1", 0), stop("2", 1), date(), seats(1, 0.0)).is_ok());
    }
}

//! Leg probing: asking the oracle whether a hop between two stops is
//! bookable.
//!
//! A search between two stations returns every train on that day. Only the
//! one leaving at the stop's scheduled time is the watched route, so offers
//! are matched on departure time before trusting their seat counts.

use std::future::Future;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{SeatAvailability, Stop, same_minute};
use crate::regiojet::UpstreamError;

use super::source::SeatOracle;

/// Something that can tell whether a hop between two stops is bookable.
pub trait LegProbe: Send + Sync {
    /// Seat availability for travelling from `from` to `to` on `date`.
    ///
    /// `Ok(None)` means the hop is not bookable; `Err` means it could not
    /// be determined.
    fn availability(
        &self,
        from: &Stop,
        to: &Stop,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<SeatAvailability>, UpstreamError>> + Send;
}

impl<O: SeatOracle> LegProbe for O {
    fn availability(
        &self,
        from: &Stop,
        to: &Stop,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<SeatAvailability>, UpstreamError>> + Send {
        probe_leg(self, from, to, date)
    }
}

/// Probe a hop against a seat oracle.
///
/// Searches offers between the two stations and takes the first one that
/// departs at the boarding stop's scheduled minute and whose route details
/// report free seats. A failed detail fetch skips that offer; a failed
/// search fails the probe.
pub async fn probe_leg<O: SeatOracle + ?Sized>(
    oracle: &O,
    from: &Stop,
    to: &Stop,
    date: NaiveDate,
) -> Result<Option<SeatAvailability>, UpstreamError> {
    let Some(scheduled) = from.scheduled_departure else {
        debug!(station = %from.station, "no scheduled departure, cannot match offers");
        return Ok(None);
    };

    let offers = oracle.search_routes(from.station, to.station, date).await?;

    for offer in offers {
        let offered = offer.departure.time();
        if !same_minute(offered, scheduled) {
            debug!(
                from = %from.station,
                to = %to.station,
                route = %offer.route,
                %offered,
                %scheduled,
                "departure mismatch, skipping offer"
            );
            continue;
        }

        let details = match oracle.route_details(offer.route, from.station, to.station).await {
            Ok(details) => details,
            Err(e) => {
                debug!(route = %offer.route, error = %e, "route details unavailable");
                continue;
            }
        };

        if details.free_seats == 0 {
            continue;
        }

        let departure = details.departure.map(|dt| dt.time());
        let arrival = details.arrival.map(|dt| dt.time());

        return Ok(Some(SeatAvailability {
            route: offer.route,
            free_seats: details.free_seats,
            price: details.price_from,
            departure,
            arrival,
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, StationId};
    use crate::regiojet::MockUpstream;
    use chrono::NaiveTime;

    fn station(n: i64) -> StationId {
        StationId::from_raw(n).unwrap()
    }

    fn route(n: i64) -> RouteId {
        RouteId::from_raw(n).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn matching_offer_is_feasible() {
        let mock = MockUpstream::new();
        mock.add_leg(route(7), station(1), station(2), date(), hm(10, 0), 4, 99.0)
            .await;

        let from = Stop::new(station(1), 0, Some(hm(10, 0)));
        let to = Stop::new(station(2), 1, Some(hm(10, 30)));

        let seats = mock.availability(&from, &to, date()).await.unwrap().unwrap();
        assert_eq!(seats.route, route(7));
        assert_eq!(seats.free_seats, 4);
        assert_eq!(seats.price, 99.0);
        assert_eq!(seats.departure, Some(hm(10, 0)));
        assert_eq!(seats.arrival, Some(hm(10, 30)));
    }

    #[tokio::test]
    async fn other_train_between_same_stations_is_ignored() {
        let mock = MockUpstream::new();
        // A later train has seats; the watched 10:00 one is not offered.
        mock.add_leg(route(8), station(1), station(2), date(), hm(12, 0), 40, 50.0)
            .await;

        let from = Stop::new(station(1), 0, Some(hm(10, 0)));
        let to = Stop::new(station(2), 1, None);

        assert_eq!(mock.availability(&from, &to, date()).await.unwrap(), None);
        assert_eq!(mock.detail_calls(), 0);
    }

    #[tokio::test]
    async fn seconds_do_not_matter() {
        let mock = MockUpstream::new();
        mock.add_leg(route(7), station(1), station(2), date(), hm(10, 0), 1, 10.0)
            .await;

        let scheduled = NaiveTime::from_hms_opt(10, 0, 45).unwrap();
        let from = Stop::new(station(1), 0, Some(scheduled));
        let to = Stop::new(station(2), 1, None);

        assert!(mock.availability(&from, &to, date()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sold_out_is_infeasible() {
        let mock = MockUpstream::new();
        mock.add_leg(route(7), station(1), station(2), date(), hm(10, 0), 0, 99.0)
            .await;

        let from = Stop::new(station(1), 0, Some(hm(10, 0)));
        let to = Stop::new(station(2), 1, None);

        assert_eq!(mock.availability(&from, &to, date()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_details_skip_offer_failed_search_fails_probe() {
        let mock = MockUpstream::new();
        mock.add_leg(route(7), station(1), station(2), date(), hm(10, 0), 3, 99.0)
            .await;
        mock.fail_details(route(7)).await;

        let from = Stop::new(station(1), 0, Some(hm(10, 0)));
        let to = Stop::new(station(2), 1, None);
        assert_eq!(mock.availability(&from, &to, date()).await.unwrap(), None);

        mock.fail_search(station(1), station(2)).await;
        assert!(mock.availability(&from, &to, date()).await.is_err());
    }

    #[tokio::test]
    async fn missing_schedule_is_infeasible_without_lookup() {
        let mock = MockUpstream::new();
        let from = Stop::new(station(1), 0, None);
        let to = Stop::new(station(2), 1, None);

        assert_eq!(mock.availability(&from, &to, date()).await.unwrap(), None);
        assert_eq!(mock.search_calls(), 0);
    }
}

//! Itinerary ordering for discovery results.

use std::collections::HashSet;

use crate::domain::{Itinerary, StationId};

/// Order itineraries by preference.
///
/// Fewest legs (fewest seat changes) first. The sort is stable, so
/// itineraries with the same leg count keep discovery order. Itineraries
/// that change at the same stations as an earlier one are dropped.
pub fn rank_itineraries(itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    let mut itineraries = deduplicate(itineraries);
    itineraries.sort_by_key(Itinerary::leg_count);
    itineraries
}

/// Remove itineraries that visit the same stations as an earlier one.
///
/// A looping route can serve a station twice, which yields two paths
/// through the same stations at different points of the route. Only the
/// first is useful to the traveller.
pub fn deduplicate(itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    let mut seen: HashSet<Vec<StationId>> = HashSet::new();

    itineraries
        .into_iter()
        .filter(|itinerary| seen.insert(itinerary.stations()))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Leg, RouteId, SeatAvailability, Stop};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// Generate an itinerary from origin 1 to destination 100 through a
    /// sorted subset of intermediate stations 2..10.
    fn itinerary_strategy() -> impl Strategy<Value = Itinerary> {
        (prop::collection::btree_set(2i64..10, 0..5), 1u32..50).prop_map(|(via, seats)| {
            let mut stations = vec![1i64];
            stations.extend(via);
            stations.push(100);

            let legs = stations
                .windows(2)
                .map(|w| {
                    // Sequence number equals station number along this route.
                    let from = Stop::new(StationId::from_raw(w[0]).unwrap(), w[0] as u32, None);
                    let to = Stop::new(StationId::from_raw(w[1]).unwrap(), w[1] as u32, None);
                    let availability = SeatAvailability {
                        route: RouteId::from_raw(1).unwrap(),
                        free_seats: seats,
                        price: 10.0,
                        departure: None,
                        arrival: None,
                    };
                    Leg::new(from, to, date(), availability).unwrap()
                })
                .collect();

            Itinerary::new(legs).unwrap()
        })
    }

    proptest! {
        #[test]
        fn ranked_by_leg_count(itineraries in prop::collection::vec(itinerary_strategy(), 0..12)) {
            let ranked = rank_itineraries(itineraries);

            for window in ranked.windows(2) {
                prop_assert!(window[0].leg_count() <= window[1].leg_count());
            }
        }

        #[test]
        fn ranking_keeps_first_of_each_path(itineraries in prop::collection::vec(itinerary_strategy(), 0..12)) {
            let distinct: HashSet<Vec<StationId>> =
                itineraries.iter().map(Itinerary::stations).collect();
            let ranked = rank_itineraries(itineraries.clone());

            prop_assert_eq!(ranked.len(), distinct.len());

            // Equal leg counts keep their relative input order.
            for window in ranked.windows(2) {
                if window[0].leg_count() == window[1].leg_count() {
                    let first = itineraries.iter().position(|i| i == &window[0]);
                    let second = itineraries.iter().position(|i| i == &window[1]);
                    prop_assert!(first < second);
                }
            }
        }
    }
}

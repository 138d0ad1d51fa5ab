//! Itinerary discovery.
//!
//! Finds every way to ride a route from an origin stop to a destination
//! station by changing seats at intermediate stops, where each hop must be
//! independently bookable on the travel date.

use std::collections::HashSet;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{Itinerary, Leg, RouteId, SeatAvailability, StationId, Stop};
use crate::regiojet::UpstreamError;

use super::config::SearchConfig;
use super::graph::{GraphError, StopGraph};
use super::probe::LegProbe;
use super::rank::rank_itineraries;
use super::source::TimetableSource;

/// Error from itinerary discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The route's timetable could not be fetched
    #[error("failed to look up timetable: {0}")]
    LookupFailure(#[from] UpstreamError),

    /// The origin station is not served by the route
    #[error("origin station {0} is not on the route")]
    OriginNotFound(StationId),

    /// The timetable is unusable
    #[error("unusable timetable: {0}")]
    InvalidTimetable(GraphError),
}

impl From<GraphError> for DiscoveryError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::OriginNotFound(station) => DiscoveryError::OriginNotFound(station),
            other => DiscoveryError::InvalidTimetable(other),
        }
    }
}

/// A partial path during search.
///
/// Every branch owns its path and visited set, so sibling branches never
/// see each other's state.
#[derive(Debug, Clone)]
struct Branch {
    /// Index of the stop the path currently ends at.
    at: usize,

    /// Legs ridden so far.
    legs: Vec<Leg>,

    /// Stations on the path so far.
    visited: HashSet<StationId>,
}

/// Itinerary planner over one route.
pub struct Planner<'a, T, P> {
    timetable: &'a T,
    probe: &'a P,
    config: &'a SearchConfig,
}

impl<'a, T: TimetableSource, P: LegProbe> Planner<'a, T, P> {
    /// Create a new planner.
    pub fn new(timetable: &'a T, probe: &'a P, config: &'a SearchConfig) -> Self {
        Self {
            timetable,
            probe,
            config,
        }
    }

    /// Find alternative itineraries along `route` from `origin` to
    /// `destination` on `date`.
    ///
    /// Fetches the timetable, resolves the origin and runs [`discover`].
    /// An empty list means no connecting itinerary exists.
    ///
    /// [`discover`]: Planner::discover
    pub async fn find_alternatives(
        &self,
        route: RouteId,
        origin: StationId,
        destination: StationId,
        date: NaiveDate,
    ) -> Result<Vec<Itinerary>, DiscoveryError> {
        let stops = self.timetable.stops(route).await?;
        let graph = StopGraph::build(stops, origin)?;

        let itineraries = self.discover(&graph, destination, date).await;

        info!(
            %route,
            %origin,
            %destination,
            found = itineraries.len(),
            "alternative search complete"
        );

        Ok(itineraries)
    }

    /// Enumerate every simple path from the graph's origin to
    /// `destination` whose legs are all bookable on `date`.
    ///
    /// Depth-first with an explicit stack. Each level probes every
    /// unvisited stop further along the route, not just the next one, so
    /// a sold-out intermediate stop can be skipped with a longer hop.
    /// Probes at one level run concurrently in batches of
    /// `probe_concurrency`; their results are consumed in stop order so the
    /// output order does not depend on timing.
    ///
    /// Probe failures make that hop infeasible and never abort the search.
    /// Results are ordered by leg count, ties in discovery order.
    pub async fn discover(
        &self,
        graph: &StopGraph,
        destination: StationId,
        date: NaiveDate,
    ) -> Vec<Itinerary> {
        let origin = graph.origin();
        let mut found = Vec::new();
        let mut probes = 0usize;

        let mut stack = vec![Branch {
            at: graph.origin_index(),
            legs: Vec::new(),
            visited: HashSet::from([origin.station]),
        }];

        while let Some(branch) = stack.pop() {
            let Some(here) = graph.stop(branch.at) else {
                continue;
            };

            if here.station == destination {
                if !branch.legs.is_empty() {
                    match Itinerary::new(branch.legs) {
                        Ok(itinerary) => found.push(itinerary),
                        Err(e) => warn!(error = %e, "discarding inconsistent itinerary"),
                    }
                }
                continue;
            }

            let candidates: Vec<(usize, &Stop)> = graph
                .forward(branch.at)
                .filter(|(_, stop)| !branch.visited.contains(&stop.station))
                .collect();

            let mut outcomes = Vec::with_capacity(candidates.len());
            for batch in candidates.chunks(self.config.probe_concurrency.max(1)) {
                let futures: Vec<_> = batch
                    .iter()
                    .map(|&(index, to)| async move {
                        (index, self.feasible(here, to, date).await)
                    })
                    .collect();

                outcomes.extend(join_all(futures).await);
                probes += batch.len();
            }

            // Reversed so the first feasible stop is explored first.
            for (index, availability) in outcomes.into_iter().rev() {
                let Some(availability) = availability else {
                    continue;
                };
                let Some(to) = graph.stop(index) else {
                    continue;
                };

                let leg = match Leg::new(here.clone(), to.clone(), date, availability) {
                    Ok(leg) => leg,
                    Err(e) => {
                        debug!(from = %here.station, to = %to.station, error = %e, "unusable leg");
                        continue;
                    }
                };

                let mut legs = branch.legs.clone();
                legs.push(leg);
                let mut visited = branch.visited.clone();
                visited.insert(to.station);

                stack.push(Branch {
                    at: index,
                    legs,
                    visited,
                });
            }
        }

        debug!(
            origin = %origin.station,
            %destination,
            probes,
            found = found.len(),
            "discovery complete"
        );

        rank_itineraries(found)
    }

    /// Probe one hop, treating failures as infeasible.
    async fn feasible(&self, from: &Stop, to: &Stop, date: NaiveDate) -> Option<SeatAvailability> {
        match self.probe.availability(from, to, date).await {
            Ok(availability) => availability,
            Err(e) => {
                warn!(
                    from = %from.station,
                    to = %to.station,
                    error = %e,
                    "leg probe failed, treating as unavailable"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;

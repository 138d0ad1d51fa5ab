//! Stop graph built from a route's timetable.
//!
//! A route is a linear sequence of stops, so the "graph" is the stop list
//! in travel order: every stop has an edge to every stop after it.

use std::collections::HashSet;

use crate::domain::{StationId, Stop};

/// Error building a stop graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The timetable has no stops
    #[error("timetable has no stops")]
    EmptyTimetable,

    /// Two stops share a sequence number
    #[error("two stops share sequence number {0}")]
    DuplicateSequence(u32),

    /// The origin station is not served by the route
    #[error("origin station {0} is not on the route")]
    OriginNotFound(StationId),
}

/// A route's stops in travel order, with the origin resolved.
///
/// # Invariants
///
/// - At least one stop
/// - Sequence numbers strictly increase
/// - `origin` indexes the first stop at the origin station
#[derive(Debug, Clone)]
pub struct StopGraph {
    stops: Vec<Stop>,
    origin: usize,
}

impl StopGraph {
    /// Build the graph for a timetable and resolve the origin.
    ///
    /// Stops may arrive in any order; they are sorted by sequence. When a
    /// looping route serves the origin twice, the earlier stop is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use seat_watch::domain::{StationId, Stop};
    /// use seat_watch::planner::StopGraph;
    ///
    /// let a = StationId::parse("1").unwrap();
    /// let b = StationId::parse("2").unwrap();
    /// let stops = vec![Stop::new(b, 1, None), Stop::new(a, 0, None)];
    ///
    /// let graph = StopGraph::build(stops, a).unwrap();
    /// assert_eq!(graph.origin().station, a);
    /// assert_eq!(graph.forward(graph.origin_index()).count(), 1);
    ///
    /// let c = StationId::parse("3").unwrap();
    /// assert!(StopGraph::build(graph.stops().to_vec(), c).is_err());
    /// ```
    pub fn build(mut stops: Vec<Stop>, origin: StationId) -> Result<Self, GraphError> {
        if stops.is_empty() {
            return Err(GraphError::EmptyTimetable);
        }

        stops.sort_by_key(|s| s.sequence);

        let mut seen = HashSet::with_capacity(stops.len());
        for stop in &stops {
            if !seen.insert(stop.sequence) {
                return Err(GraphError::DuplicateSequence(stop.sequence));
            }
        }

        let origin = stops
            .iter()
            .position(|s| s.station == origin)
            .ok_or(GraphError::OriginNotFound(origin))?;

        Ok(Self { stops, origin })
    }

    /// All stops in travel order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The stop at an index, if the graph has that many stops.
    ///
    /// Indices handed out by [`origin_index`](Self::origin_index) and
    /// [`forward`](Self::forward) are always in range.
    pub fn stop(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    /// Index of the origin stop in travel order.
    pub fn origin_index(&self) -> usize {
        self.origin
    }

    /// The origin stop.
    pub fn origin(&self) -> &Stop {
        &self.stops[self.origin]
    }

    /// Stops strictly after the stop at `index`, with their indices.
    pub fn forward(&self, index: usize) -> impl Iterator<Item = (usize, &Stop)> {
        self.stops.iter().enumerate().skip(index + 1)
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false: a graph has at least one stop.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

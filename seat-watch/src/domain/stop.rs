//! Stops along a route's timetable.

use chrono::NaiveTime;

use super::StationId;

/// A station on one specific route.
///
/// Stops are ordered by `sequence`, which strictly increases in travel
/// order. The scheduled departure is a local time of day; the terminus and
/// stops with unreadable timetable data have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Station served at this stop
    pub station: StationId,
    /// Position along the route
    pub sequence: u32,
    /// Scheduled local departure time, if published
    pub scheduled_departure: Option<NaiveTime>,
}

impl Stop {
    /// Creates a new stop.
    pub fn new(station: StationId, sequence: u32, scheduled_departure: Option<NaiveTime>) -> Self {
        Self {
            station,
            sequence,
            scheduled_departure,
        }
    }

    /// True if `other` lies strictly further along the route.
    pub fn precedes(&self, other: &Stop) -> bool {
        self.sequence < other.sequence
    }
}

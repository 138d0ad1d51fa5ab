//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from API/IO errors.

use super::StationId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Invalid leg construction (e.g., travelling backwards along the route)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't share a stop
    #[error("legs are not adjacent: one ends at {0}, the next starts at {1}")]
    NotAdjacent(StationId, StationId),

    /// A station appears twice within one itinerary
    #[error("station {0} is visited twice")]
    RepeatedStation(StationId),

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,

    /// A stored watch record could not be decoded
    #[error("malformed watch record: {0}")]
    MalformedWatch(String),

    /// A notification target that cannot be stored in a watch record
    #[error("invalid notification target: {0}")]
    InvalidTarget(&'static str),
}

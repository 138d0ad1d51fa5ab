//! Itinerary planner using depth-first search.
//!
//! This module implements the core discovery algorithm that answers:
//! "The watched train is sold out between my stations - can I still ride it
//! by changing seats at stops along the way?"
//!
//! The algorithm builds the route's stop sequence from its timetable and
//! explores every simple path from the origin to the destination, asking
//! the seat oracle whether each hop is bookable.

mod config;
mod graph;
mod probe;
mod rank;
mod search;
mod source;

pub use config::SearchConfig;
pub use graph::{GraphError, StopGraph};
pub use probe::{LegProbe, probe_leg};
pub use rank::{deduplicate, rank_itineraries};
pub use search::{DiscoveryError, Planner};
pub use source::{SeatOracle, TimetableSource};

//! Station id → display name lookup.
//!
//! Built from the RegioJet locations list at startup and refreshed daily.
//! Only train stations are kept.

mod client;
mod error;
mod names;

pub use client::{StationClient, StationClientConfig};
pub use error::StationError;
pub use names::StationNames;

//! RegioJet public REST API client.
//!
//! This module provides an HTTP client for the RegioJet booking API, which
//! serves route searches, per-route seat availability, timetables and the
//! station list.
//!
//! Key characteristics of the API:
//! - Prices are quoted in the currency named by the `X-Currency` header
//! - Search results list free seats, but only the route details endpoint
//!   is authoritative
//! - Timetables give local times of day as "HH:MM:SS.fff" while searches
//!   give RFC 3339 timestamps

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_CURRENCY, RegioJetClient, RegioJetConfig};
pub use convert::{ConversionError, convert_locations};
pub use error::UpstreamError;
pub use mock::MockUpstream;
pub use types::{City, Country, LocationStation};

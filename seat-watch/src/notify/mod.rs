//! Notifications sent when seats appear.
//!
//! Rendering lives in [`format`]; delivery is behind the [`Notifier`]
//! trait so the scanner can be tested without a webhook.

mod discord;
mod format;

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{RouteDetails, VehicleSeats};

pub use discord::{
    DiscordNotifier, Embed, EmbedField, EmbedFooter, WebhookPayload, alternatives_payload,
    direct_payload,
};
pub use format::{
    ItineraryView, LegView, RenderSkip, format_price, render_all, render_itinerary,
};

/// Error delivering a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The receiver answered with an error status
    #[error("notification rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The target is not a usable webhook URL
    #[error("invalid notification target: {0}")]
    InvalidTarget(String),
}

/// Seats are free on the watched route itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectAvailability {
    /// Route details between the watched stations
    pub details: RouteDetails,
    /// Free seats per carriage (may be empty if unknown)
    pub vehicles: Vec<VehicleSeats>,
}

/// The watched route is sold out, but changing seats works.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativesReport {
    /// Origin station name
    pub from: String,
    /// Destination station name
    pub to: String,
    /// Travel date
    pub date: NaiveDate,
    /// Rendered itineraries, best first
    pub itineraries: Vec<ItineraryView>,
}

/// Delivers notifications to a target (for Discord, a webhook URL).
pub trait Notifier: Send + Sync {
    /// Announce free seats on the watched route.
    fn notify_direct(
        &self,
        target: &str,
        availability: &DirectAvailability,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;

    /// Announce alternative itineraries.
    fn notify_alternatives(
        &self,
        target: &str,
        report: &AlternativesReport,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

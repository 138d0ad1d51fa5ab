//! Station list error types.

/// Errors that can occur when fetching the station list.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The client could not be configured
    #[error("invalid station client configuration: {0}")]
    Config(String),

    /// The list parsed but held no train stations
    #[error("locations list contains no train stations")]
    NoStations,
}

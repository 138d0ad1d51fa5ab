//! RegioJet client error types.

/// Errors from the RegioJet HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response parsed but its content is unusable
    #[error("invalid response: {0}")]
    Conversion(#[from] super::convert::ConversionError),

    /// Rate limited by the API
    #[error("rate limited by RegioJet API")]
    RateLimited,

    /// Request parameters cannot be sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl UpstreamError {
    /// True for failures that may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Http(_) | UpstreamError::RateLimited => true,
            UpstreamError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

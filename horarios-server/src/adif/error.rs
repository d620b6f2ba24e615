//! ADIF adapter error types.

use crate::domain::{InvalidNetwork, InvalidStation};

/// Maximum number of characters of an upstream body kept for diagnostics.
pub const EXCERPT_CHARS: usize = 500;

/// Errors from fetching a station schedule.
///
/// Every variant is terminal for the request that produced it; nothing is
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum AdifError {
    /// Station identifier missing or malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Identifier has no entry in the station slug table
    #[error("unknown station code: {code}")]
    UnmappedStation { code: String },

    /// No token could be read from the landing page
    #[error("could not obtain p_p_auth token: {reason}")]
    TokenAcquisition { reason: String },

    /// Schedule endpoint answered with a non-2xx status
    #[error("upstream HTTP error {status}")]
    UpstreamHttp { status: u16, body: String },

    /// Schedule endpoint answered with something that is not JSON
    #[error("invalid response format: {message}")]
    UpstreamFormat {
        message: String,
        body: Option<String>,
    },

    /// Connectivity failure talking to the schedule endpoint
    ///
    /// The request URL carries the token, so it is stripped on conversion.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// HTTP client could not be constructed
    #[error("client error: {0}")]
    Client(String),
}

impl AdifError {
    /// Stable snake_case name of the error kind, used in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AdifError::InvalidInput(_) => "invalid_input",
            AdifError::UnmappedStation { .. } => "unmapped_station",
            AdifError::TokenAcquisition { .. } => "token_acquisition_failure",
            AdifError::UpstreamHttp { .. } => "upstream_http_error",
            AdifError::UpstreamFormat { .. } => "upstream_format_error",
            AdifError::Network(_) => "network_error",
            AdifError::Client(_) => "internal_error",
        }
    }

    pub(crate) fn token(reason: impl Into<String>) -> Self {
        AdifError::TokenAcquisition {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for AdifError {
    fn from(e: reqwest::Error) -> Self {
        AdifError::Network(e.without_url())
    }
}

impl From<InvalidStation> for AdifError {
    fn from(e: InvalidStation) -> Self {
        AdifError::InvalidInput(e.to_string())
    }
}

impl From<InvalidNetwork> for AdifError {
    fn from(e: InvalidNetwork) -> Self {
        AdifError::InvalidInput(e.to_string())
    }
}

/// Truncate an upstream body to [`EXCERPT_CHARS`] characters.
pub fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}

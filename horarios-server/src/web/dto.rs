//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

/// Query string of the schedule endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct HorariosQuery {
    /// Station identifier (ignored when given in the path)
    pub codigo: Option<String>,

    /// Commuter network, e.g. `BILBAO`
    pub red: Option<String>,
}

/// A slug table entry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationEntry {
    pub codigo: String,
    pub slug: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `true`
    pub error: bool,

    /// Machine-readable error kind, e.g. `upstream_http_error`
    pub kind: String,

    /// Human-readable description
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Upstream diagnostics attached to an error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Status code returned by the upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Truncated upstream body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

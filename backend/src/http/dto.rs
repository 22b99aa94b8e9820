//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::models::PlaylistEntry;
use crate::services::{BackfillReport, EstimateBreakdown};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query parameters for the estimate endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateQuery {
    /// Identity key of what is playing
    pub key: Option<String>,
    /// RFC 3339 instant to evaluate (default: now)
    #[serde(default)]
    pub at: Option<String>,
    /// Client timestamp in epoch milliseconds, selects the live window
    #[serde(default)]
    pub ts: Option<i64>,
    /// Include the intermediate values
    #[serde(default)]
    pub debug: bool,
}

/// Query parameters for the live stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveQuery {
    pub key: Option<String>,
    /// Client timestamp in epoch milliseconds at connect time; later ticks
    /// keep the same offset from the server clock
    #[serde(default)]
    pub ts: Option<i64>,
}

/// One estimate as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub listeners: u32,
    pub key: String,
    /// Evaluated instant in the reference zone, RFC 3339
    pub at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<EstimateBreakdown>,
}

/// Response of the backfill endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillResponse {
    pub entries: Vec<PlaylistEntry>,
    pub report: BackfillReport,
}

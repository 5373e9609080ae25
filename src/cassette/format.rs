//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session: every port call in the order it happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Session name.
    pub name: String,
    /// When the session was written.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the session was recorded at.
    pub commit: String,
    /// Recorded calls.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One port call and its result.
///
/// `output` uses the `{"Ok": ...}` / `{"Err": "..."}` convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the session, starting at 0.
    pub seq: u64,
    /// Port name, e.g. `thumbnail_service`.
    pub port: String,
    /// Method name, e.g. `generate`.
    pub method: String,
    /// Serialized request.
    pub input: serde_json::Value,
    /// Serialized result.
    pub output: serde_json::Value,
}

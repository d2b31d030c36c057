//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of broker interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in recording order.
    pub interactions: Vec<Interaction>,
}

/// One call through a port and what it returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position within the whole cassette.
    pub seq: u64,
    /// Port name, e.g. `"openai_broker"`.
    pub port: String,
    /// Method name on the port.
    pub method: String,
    /// Serialized arguments.
    pub input: serde_json::Value,
    /// Serialized result using the `Ok`/`Err` convention.
    pub output: serde_json::Value,
}

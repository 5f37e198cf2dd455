//! JSON output formatting

use chrono::Utc;
use serde::Serialize;

use crate::sync::NetworkState;

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    /// The actual data
    pub data: T,

    /// Metadata about the response
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp of the response
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Connectivity after the command ran; OFFLINE means data may be stale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkState>,
}

impl<T> JsonOutput<T> {
    /// Create a new JSON output with metadata
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                network: None,
            },
        }
    }

    pub fn with_network(mut self, state: NetworkState) -> Self {
        self.meta.network = Some(state);
        self
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}

/// Format data as pretty-printed JSON, recording the connectivity state
pub fn format_json_with_network<T: Serialize + ?Sized>(
    data: &T,
    state: NetworkState,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data).with_network(state))
}

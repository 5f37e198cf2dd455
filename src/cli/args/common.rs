//! Common CLI types shared across commands

use std::str::FromStr;

use serde_json::Value;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format - human-readable (default)
    #[default]
    Table,
    /// JSON format - structured for scripts
    Json,
}

/// A JSON document given on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct JsonArg(pub Value);

impl FromStr for JsonArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
            .map(JsonArg)
            .map_err(|e| format!("invalid JSON: {}", e))
    }
}

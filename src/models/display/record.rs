//! Display model for untyped resource records

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use super::common::{cell, truncate_string};

const SUMMARY_WIDTH: usize = 60;

/// Fields tried, in order, for a record's one-line summary
const SUMMARY_FIELDS: [&str; 5] = ["title", "name", "text", "message", "label"];

/// Generic record row: ID plus a one-line summary
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RecordDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "SUMMARY")]
    pub summary: String,
}

impl From<&Value> for RecordDisplay {
    fn from(record: &Value) -> Self {
        let summary = SUMMARY_FIELDS
            .iter()
            .find_map(|field| record.get(*field).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| record.to_string());

        Self {
            id: cell(record.get("id")),
            summary: truncate_string(&summary, SUMMARY_WIDTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_prefers_named_fields() {
        let display = RecordDisplay::from(&json!({"id": 3, "title": "Паводок", "text": "..."}));
        assert_eq!(display.id, "3");
        assert_eq!(display.summary, "Паводок");
    }

    #[test]
    fn test_summary_falls_back_to_json() {
        let display = RecordDisplay::from(&json!({"lat": 55.7}));
        assert_eq!(display.id, "-");
        assert_eq!(display.summary, r#"{"lat":55.7}"#);
    }
}

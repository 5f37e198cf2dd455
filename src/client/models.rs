//! Backend resource models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A map region with its current risk index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Current risk index value
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub index: Option<f64>,

    /// Remaining fields (coordinates, zoom, colors) kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One day of risk-index history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Day the value applies to (YYYY-MM-DD)
    pub date: String,

    #[serde(deserialize_with = "lenient_f64_required")]
    pub value: f64,
}

/// Region detail with its history, as returned by `region_data/:id`
/// and by index/history updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionData {
    pub region: Region,

    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

/// Payload for creating a region; coordinates travel as form strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRegion {
    pub name: String,
    pub lat: String,
    pub lng: String,
    pub zoom: String,
}

/// Response of every write endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// ID of a created record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Set locally when the write was queued for later sync
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub queued: bool,

    /// Refreshed sub-resources (`region`, `history`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WriteResponse {
    /// Successful write with no further detail
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            id: None,
            queued: false,
            extra: Map::new(),
        }
    }

    /// Failed write carrying `error`
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::success()
        }
    }

    /// Write that could not be sent and sits in the pending queue
    pub fn queued(error: impl Into<String>) -> Self {
        Self {
            queued: true,
            ..Self::failed(error)
        }
    }

    /// Refreshed region detail, if the server sent one back
    pub fn region_data(&self) -> Option<RegionData> {
        let region = self.extra.get("region")?.clone();
        let history = self.extra.get("history").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(serde_json::json!({ "region": region, "history": history })).ok()
    }
}

/// Accept numbers sent either as JSON numbers or numeric strings
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64_required<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer)?.ok_or_else(|| serde::de::Error::custom("expected a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_region_keeps_extra_fields() {
        let region: Region = serde_json::from_value(json!({
            "id": 7,
            "name": "Москва",
            "lat": "55.75",
            "lng": "37.61",
            "zoom": "11",
            "index": "4.2"
        }))
        .unwrap();

        assert_eq!(region.id, 7);
        assert_eq!(region.index, Some(4.2));
        assert_eq!(region.extra["lat"], json!("55.75"));
    }

    #[test]
    fn test_region_without_index() {
        let region: Region = serde_json::from_value(json!({"id": 1, "name": "Тула"})).unwrap();
        assert_eq!(region.index, None);
    }

    #[test]
    fn test_write_response_with_refreshed_region() {
        let resp: WriteResponse = serde_json::from_value(json!({
            "ok": true,
            "region": {"id": 3, "name": "Казань", "index": 5},
            "history": [{"date": "2024-05-01", "value": 5}]
        }))
        .unwrap();

        assert!(resp.ok);
        let data = resp.region_data().unwrap();
        assert_eq!(data.region.index, Some(5.0));
        assert_eq!(data.history.len(), 1);
    }

    #[test]
    fn test_write_response_queued_serialization() {
        let resp = WriteResponse::queued("offline");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["queued"], json!(true));

        let plain = serde_json::to_value(WriteResponse::failed("boom")).unwrap();
        assert!(plain.get("queued").is_none());
    }
}

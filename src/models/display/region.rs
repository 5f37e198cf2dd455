//! Region display models

use serde::Serialize;
use tabled::Tabled;

use super::common::cell;
use crate::client::{HistoryPoint, Region};

/// Region display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RegionDisplay {
    #[tabled(rename = "ID")]
    pub id: i64,

    #[tabled(rename = "NAME")]
    pub name: String,

    /// Current risk index, "-" when unset
    #[tabled(rename = "INDEX")]
    pub index: String,

    #[tabled(rename = "LAT")]
    pub lat: String,

    #[tabled(rename = "LNG")]
    pub lng: String,
}

impl From<&Region> for RegionDisplay {
    fn from(region: &Region) -> Self {
        Self {
            id: region.id,
            name: region.name.clone(),
            index: region
                .index
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string()),
            lat: cell(region.extra.get("lat")),
            lng: cell(region.extra.get("lng")),
        }
    }
}

/// One history day
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct HistoryDisplay {
    #[tabled(rename = "DATE")]
    pub date: String,

    #[tabled(rename = "VALUE")]
    pub value: f64,
}

impl From<&HistoryPoint> for HistoryDisplay {
    fn from(point: &HistoryPoint) -> Self {
        Self {
            date: point.date.clone(),
            value: point.value,
        }
    }
}

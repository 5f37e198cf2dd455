//! Resource groups and write operations of the backend
//!
//! Every write is a `WriteAction`. It serializes as `{action, data}`, which
//! is exactly what the pending queue stores, so a queued write replays as
//! the same request it was born as.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::models::{HistoryPoint, NewRegion};
use crate::cache::TtlClass;
use crate::error::{ApiError, Result};

/// List endpoints exposed under `/api/<resource>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Regions,
    Buttons,
    Popups,
    Pages,
    Markers,
    Widgets,
    Forecasts,
    Authors,
    News,
    ConscienceHistory,
    Settings,
    Reports,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Regions,
        Resource::Buttons,
        Resource::Popups,
        Resource::Pages,
        Resource::Markers,
        Resource::Widgets,
        Resource::Forecasts,
        Resource::Authors,
        Resource::News,
        Resource::ConscienceHistory,
        Resource::Settings,
        Resource::Reports,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Resource::Regions => "regions",
            Resource::Buttons => "buttons",
            Resource::Popups => "popups",
            Resource::Pages => "pages",
            Resource::Markers => "markers",
            Resource::Widgets => "widgets",
            Resource::Forecasts => "forecasts",
            Resource::Authors => "authors",
            Resource::News => "news",
            Resource::ConscienceHistory => "conscience_history",
            Resource::Settings => "settings",
            Resource::Reports => "reports",
        }
    }

    /// Collection path, e.g. `/api/markers`
    pub fn path(self) -> String {
        format!("/api/{}", self.name())
    }

    /// Freshness class for reads; `None` bypasses the Request Cache
    pub fn ttl(self) -> Option<TtlClass> {
        match self {
            Resource::Buttons
            | Resource::Pages
            | Resource::Popups
            | Resource::Widgets
            | Resource::Authors
            | Resource::Settings => Some(TtlClass::Long),
            Resource::Regions | Resource::Markers | Resource::Forecasts | Resource::News => {
                Some(TtlClass::Medium)
            }
            Resource::Reports => Some(TtlClass::Short),
            // Live voting data
            Resource::ConscienceHistory => None,
        }
    }

    /// Whether deletes go through `POST /api/<resource>/<id>/delete`
    /// instead of `DELETE /api/<resource>/<id>`
    fn deletes_via_post(self) -> bool {
        matches!(self, Resource::Buttons | Resource::Popups | Resource::Pages)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Path of a region's detail endpoint
pub fn region_data_path(id: i64) -> String {
    format!("/api/region_data/{}", id)
}

/// Path of a user's widget layout
pub fn widget_layout_path(user_id: &str) -> String {
    format!("/api/widget-layouts/{}", user_id)
}

/// A write operation against the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum WriteAction {
    AddRegion(NewRegion),
    DeleteRegion {
        id: i64,
    },
    UpdateRegionIndex {
        id: i64,
        value: f64,
    },
    UpdateRegionHistory {
        id: i64,
        history: Vec<HistoryPoint>,
    },
    DeleteHistoryDay {
        id: i64,
        date: String,
    },
    ShiftDay {
        id: i64,
    },
    Create {
        resource: Resource,
        record: Value,
    },
    Delete {
        resource: Resource,
        id: i64,
    },
    ToggleConscienceButton {
        button: Value,
    },
    SaveSettings {
        settings: Value,
    },
    Notify {
        message: Value,
    },
    SaveWidgetLayout {
        user_id: String,
        layout: Value,
    },
}

impl WriteAction {
    /// Rebuild an action from a queued `(action, data)` pair
    pub fn from_parts(action: &str, data: Value) -> Result<Self> {
        serde_json::from_value(json!({ "action": action, "data": data }))
            .map_err(|e| ApiError::Parse(format!("Unknown queued action {}: {}", action, e)).into())
    }

    /// Split into the `(action, data)` pair stored in the pending queue
    pub fn to_parts(&self) -> Result<(String, Value)> {
        let mut value = serde_json::to_value(self)?;
        let action = value
            .get("action")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Parse("Action has no name".to_string()))?;
        let data = value.get_mut("data").map(Value::take).unwrap_or(Value::Null);
        Ok((action, data))
    }

    /// Symbolic name used in logs and the pending queue
    pub fn name(&self) -> &'static str {
        match self {
            WriteAction::AddRegion(_) => "add_region",
            WriteAction::DeleteRegion { .. } => "delete_region",
            WriteAction::UpdateRegionIndex { .. } => "update_region_index",
            WriteAction::UpdateRegionHistory { .. } => "update_region_history",
            WriteAction::DeleteHistoryDay { .. } => "delete_history_day",
            WriteAction::ShiftDay { .. } => "shift_day",
            WriteAction::Create { .. } => "create",
            WriteAction::Delete { .. } => "delete",
            WriteAction::ToggleConscienceButton { .. } => "toggle_conscience_button",
            WriteAction::SaveSettings { .. } => "save_settings",
            WriteAction::Notify { .. } => "notify",
            WriteAction::SaveWidgetLayout { .. } => "save_widget_layout",
        }
    }

    /// HTTP method, path, and body of the request
    pub fn request(&self) -> (Method, String, Option<Value>) {
        match self {
            WriteAction::AddRegion(region) => (
                Method::POST,
                Resource::Regions.path(),
                Some(json!(region)),
            ),
            WriteAction::DeleteRegion { id } => {
                (Method::DELETE, format!("/api/regions/{}", id), None)
            }
            WriteAction::UpdateRegionIndex { id, value } => (
                Method::POST,
                "/api/update_region_index".to_string(),
                Some(json!({ "id": id, "index": value })),
            ),
            WriteAction::UpdateRegionHistory { id, history } => (
                Method::POST,
                "/api/update_region_history".to_string(),
                Some(json!({ "id": id, "history": history })),
            ),
            WriteAction::DeleteHistoryDay { id, date } => (
                Method::POST,
                "/api/delete_history_day".to_string(),
                Some(json!({ "id": id, "date": date })),
            ),
            WriteAction::ShiftDay { id } => (
                Method::POST,
                "/api/shift_day".to_string(),
                Some(json!({ "id": id })),
            ),
            WriteAction::Create { resource, record } => {
                (Method::POST, resource.path(), Some(record.clone()))
            }
            WriteAction::Delete { resource, id } => {
                if resource.deletes_via_post() {
                    (
                        Method::POST,
                        format!("{}/{}/delete", resource.path(), id),
                        None,
                    )
                } else {
                    (Method::DELETE, format!("{}/{}", resource.path(), id), None)
                }
            }
            WriteAction::ToggleConscienceButton { button } => (
                Method::POST,
                "/api/conscience_history/button/toggle".to_string(),
                Some(button.clone()),
            ),
            WriteAction::SaveSettings { settings } => {
                (Method::POST, Resource::Settings.path(), Some(settings.clone()))
            }
            WriteAction::Notify { message } => {
                (Method::POST, "/api/notify".to_string(), Some(message.clone()))
            }
            WriteAction::SaveWidgetLayout { user_id, layout } => {
                (Method::POST, widget_layout_path(user_id), Some(layout.clone()))
            }
        }
    }

    /// Cache keys made stale by this write
    pub fn invalidates(&self) -> Vec<String> {
        match self {
            WriteAction::AddRegion(_) => vec![Resource::Regions.path()],
            WriteAction::DeleteRegion { id }
            | WriteAction::UpdateRegionIndex { id, .. }
            | WriteAction::UpdateRegionHistory { id, .. }
            | WriteAction::DeleteHistoryDay { id, .. }
            | WriteAction::ShiftDay { id }
            | WriteAction::Delete {
                resource: Resource::Regions,
                id,
            } => vec![Resource::Regions.path(), region_data_path(*id)],
            WriteAction::Create { resource, .. } | WriteAction::Delete { resource, .. } => {
                vec![resource.path()]
            }
            WriteAction::ToggleConscienceButton { .. } => {
                vec![Resource::ConscienceHistory.path(), Resource::Buttons.path()]
            }
            WriteAction::SaveSettings { .. } => vec![Resource::Settings.path()],
            WriteAction::Notify { .. } => vec![],
            WriteAction::SaveWidgetLayout { user_id, .. } => vec![widget_layout_path(user_id)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_round_trip_keeps_replay_payload() {
        let action = WriteAction::UpdateRegionIndex { id: 3, value: 4.5 };
        let (name, data) = action.to_parts().unwrap();

        assert_eq!(name, "update_region_index");
        assert_eq!(data, json!({"id": 3, "value": 4.5}));
        assert_eq!(WriteAction::from_parts(&name, data).unwrap(), action);
    }

    #[test]
    fn test_name_matches_serialized_tag() {
        let actions = [
            WriteAction::ShiftDay { id: 1 },
            WriteAction::Delete {
                resource: Resource::Markers,
                id: 2,
            },
            WriteAction::SaveWidgetLayout {
                user_id: "u1".to_string(),
                layout: json!([]),
            },
        ];
        for action in actions {
            let (name, _) = action.to_parts().unwrap();
            assert_eq!(name, action.name());
        }
    }

    #[test]
    fn test_unknown_queued_action_is_parse_error() {
        let err = WriteAction::from_parts("launch_rocket", json!({})).unwrap_err();
        assert!(err.to_string().starts_with("Parse Error"));
    }

    #[test]
    fn test_delete_styles() {
        let (method, path, _) = WriteAction::Delete {
            resource: Resource::Buttons,
            id: 5,
        }
        .request();
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/api/buttons/5/delete");

        let (method, path, _) = WriteAction::Delete {
            resource: Resource::Markers,
            id: 5,
        }
        .request();
        assert_eq!(method, Method::DELETE);
        assert_eq!(path, "/api/markers/5");
    }

    #[test]
    fn test_region_writes_invalidate_list_and_detail() {
        let keys = WriteAction::ShiftDay { id: 9 }.invalidates();
        assert!(keys.contains(&"/api/regions".to_string()));
        assert!(keys.contains(&"/api/region_data/9".to_string()));
    }

    #[test]
    fn test_generic_region_delete_invalidates_detail() {
        let generic = WriteAction::Delete {
            resource: Resource::Regions,
            id: 4,
        };
        assert_eq!(
            generic.invalidates(),
            WriteAction::DeleteRegion { id: 4 }.invalidates()
        );

        let markers = WriteAction::Delete {
            resource: Resource::Markers,
            id: 4,
        };
        assert_eq!(markers.invalidates(), vec!["/api/markers".to_string()]);
    }

    #[test]
    fn test_resource_ttls() {
        assert_eq!(Resource::Buttons.ttl(), Some(TtlClass::Long));
        assert_eq!(Resource::Regions.ttl(), Some(TtlClass::Medium));
        assert_eq!(Resource::ConscienceHistory.ttl(), None);
        assert_eq!(Resource::ConscienceHistory.path(), "/api/conscience_history");
    }
}

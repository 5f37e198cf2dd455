//! Per-resource operations exposed to the UI layer
//!
//! Each read has a `try_*` form returning `Result` and a plain form that
//! never fails: list reads fall back to an empty list, single-object reads
//! to `None`. Writes always resolve to a `WriteResponse`.

use serde_json::{Map, Value};

use super::DataService;
use crate::cache::TtlClass;
use crate::client::actions::{region_data_path, widget_layout_path};
use crate::client::{
    HistoryPoint, NewRegion, Region, RegionData, Resource, RiskApi, WriteAction, WriteResponse,
};
use crate::error::Result;

/// Collapse a failed read into its sentinel, logging why
fn or_sentinel<T>(result: Result<T>, what: &str, sentinel: T) -> T {
    result.unwrap_or_else(|err| {
        log::warn!("Failed to load {}: {}", what, err);
        sentinel
    })
}

impl<C: RiskApi> DataService<C> {
    // ========================================================================
    // Regions
    // ========================================================================

    pub async fn try_get_regions(&self) -> Result<Vec<Region>> {
        self.fetch(&Resource::Regions.path(), Resource::Regions.ttl())
            .await
    }

    pub async fn get_regions(&self) -> Vec<Region> {
        or_sentinel(self.try_get_regions().await, "regions", Vec::new())
    }

    pub async fn try_get_region_data(&self, id: i64) -> Result<RegionData> {
        self.fetch(&region_data_path(id), Some(TtlClass::Short))
            .await
    }

    pub async fn get_region_data(&self, id: i64) -> Option<RegionData> {
        self.try_get_region_data(id)
            .await
            .map(Some)
            .unwrap_or_else(|err| {
                log::warn!("Failed to load region {}: {}", id, err);
                None
            })
    }

    pub async fn add_region(&self, region: NewRegion) -> WriteResponse {
        self.write(WriteAction::AddRegion(region)).await
    }

    pub async fn delete_region(&self, id: i64) -> WriteResponse {
        self.write(WriteAction::DeleteRegion { id }).await
    }

    pub async fn update_region_index(&self, id: i64, value: f64) -> WriteResponse {
        self.write(WriteAction::UpdateRegionIndex { id, value })
            .await
    }

    pub async fn update_region_history(&self, id: i64, history: Vec<HistoryPoint>) -> WriteResponse {
        self.write(WriteAction::UpdateRegionHistory { id, history })
            .await
    }

    pub async fn delete_history_day(&self, id: i64, date: &str) -> WriteResponse {
        self.write(WriteAction::DeleteHistoryDay {
            id,
            date: date.to_string(),
        })
        .await
    }

    /// Roll a region's history forward by one day
    pub async fn shift_day(&self, id: i64) -> WriteResponse {
        self.write(WriteAction::ShiftDay { id }).await
    }

    // ========================================================================
    // Generic record collections
    // ========================================================================

    pub async fn try_get_records(&self, resource: Resource) -> Result<Vec<Value>> {
        self.fetch(&resource.path(), resource.ttl()).await
    }

    /// List any resource group as untyped records
    pub async fn get_records(&self, resource: Resource) -> Vec<Value> {
        or_sentinel(
            self.try_get_records(resource).await,
            resource.name(),
            Vec::new(),
        )
    }

    pub async fn add_record(&self, resource: Resource, record: Value) -> WriteResponse {
        self.write(WriteAction::Create { resource, record }).await
    }

    pub async fn delete_record(&self, resource: Resource, id: i64) -> WriteResponse {
        self.write(WriteAction::Delete { resource, id }).await
    }

    pub async fn get_buttons(&self) -> Vec<Value> {
        self.get_records(Resource::Buttons).await
    }

    pub async fn add_button(&self, button: Value) -> WriteResponse {
        self.add_record(Resource::Buttons, button).await
    }

    pub async fn delete_button(&self, id: i64) -> WriteResponse {
        self.delete_record(Resource::Buttons, id).await
    }

    pub async fn get_popups(&self) -> Vec<Value> {
        self.get_records(Resource::Popups).await
    }

    pub async fn add_popup(&self, popup: Value) -> WriteResponse {
        self.add_record(Resource::Popups, popup).await
    }

    pub async fn delete_popup(&self, id: i64) -> WriteResponse {
        self.delete_record(Resource::Popups, id).await
    }

    pub async fn get_pages(&self) -> Vec<Value> {
        self.get_records(Resource::Pages).await
    }

    pub async fn add_page(&self, page: Value) -> WriteResponse {
        self.add_record(Resource::Pages, page).await
    }

    pub async fn delete_page(&self, id: i64) -> WriteResponse {
        self.delete_record(Resource::Pages, id).await
    }

    pub async fn get_markers(&self) -> Vec<Value> {
        self.get_records(Resource::Markers).await
    }

    pub async fn add_marker(&self, marker: Value) -> WriteResponse {
        self.add_record(Resource::Markers, marker).await
    }

    pub async fn delete_marker(&self, id: i64) -> WriteResponse {
        self.delete_record(Resource::Markers, id).await
    }

    pub async fn get_widgets(&self) -> Vec<Value> {
        self.get_records(Resource::Widgets).await
    }

    pub async fn add_widget(&self, widget: Value) -> WriteResponse {
        self.add_record(Resource::Widgets, widget).await
    }

    pub async fn delete_widget(&self, id: i64) -> WriteResponse {
        self.delete_record(Resource::Widgets, id).await
    }

    pub async fn get_forecasts(&self) -> Vec<Value> {
        self.get_records(Resource::Forecasts).await
    }

    pub async fn add_forecast(&self, forecast: Value) -> WriteResponse {
        self.add_record(Resource::Forecasts, forecast).await
    }

    pub async fn get_authors(&self) -> Vec<Value> {
        self.get_records(Resource::Authors).await
    }

    pub async fn get_news(&self) -> Vec<Value> {
        self.get_records(Resource::News).await
    }

    pub async fn add_news(&self, item: Value) -> WriteResponse {
        self.add_record(Resource::News, item).await
    }

    pub async fn get_reports(&self) -> Vec<Value> {
        self.get_records(Resource::Reports).await
    }

    pub async fn submit_report(&self, report: Value) -> WriteResponse {
        self.add_record(Resource::Reports, report).await
    }

    // ========================================================================
    // Conscience voting, settings, notifications, layouts
    // ========================================================================

    pub async fn get_conscience_history(&self) -> Vec<Value> {
        self.get_records(Resource::ConscienceHistory).await
    }

    pub async fn toggle_conscience_button(&self, button: Value) -> WriteResponse {
        self.write(WriteAction::ToggleConscienceButton { button })
            .await
    }

    pub async fn try_get_settings(&self) -> Result<Value> {
        self.read(&Resource::Settings.path(), Resource::Settings.ttl())
            .await
    }

    /// Settings object; empty object when unavailable
    pub async fn get_settings(&self) -> Value {
        or_sentinel(
            self.try_get_settings().await,
            "settings",
            Value::Object(Map::new()),
        )
    }

    pub async fn save_settings(&self, settings: Value) -> WriteResponse {
        self.write(WriteAction::SaveSettings { settings }).await
    }

    pub async fn notify(&self, message: Value) -> WriteResponse {
        self.write(WriteAction::Notify { message }).await
    }

    pub async fn try_get_widget_layout(&self, user_id: &str) -> Result<Value> {
        self.read(&widget_layout_path(user_id), Some(TtlClass::Medium))
            .await
    }

    pub async fn get_widget_layout(&self, user_id: &str) -> Option<Value> {
        self.try_get_widget_layout(user_id)
            .await
            .map(Some)
            .unwrap_or_else(|err| {
                log::warn!("Failed to load widget layout for {}: {}", user_id, err);
                None
            })
    }

    pub async fn save_widget_layout(&self, user_id: &str, layout: Value) -> WriteResponse {
        self.write(WriteAction::SaveWidgetLayout {
            user_id: user_id.to_string(),
            layout,
        })
        .await
    }
}

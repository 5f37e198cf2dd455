//! Risk Index backend client

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

pub mod actions;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use actions::{Resource, WriteAction};
pub use http::HttpClient;
#[cfg(test)]
pub use mock::MockRiskClient;
pub use models::{HistoryPoint, NewRegion, Region, RegionData, WriteResponse};

/// Transport to the REST backend.
///
/// Implementations return the decoded JSON body. Failures are reported as
/// `ApiError` so callers can tell connectivity loss from server rejection.
#[async_trait]
pub trait RiskApi: Send + Sync {
    /// GET `path` and decode the body
    async fn get(&self, path: &str) -> Result<Value>;

    /// Send a write request with an optional JSON body
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

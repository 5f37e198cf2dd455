//! Mock backend client for testing
//!
//! Serves canned JSON per `METHOD path`, records every call, and can be
//! told to fail specific requests or to behave as if the network is down.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use super::RiskApi;
use crate::error::{ApiError, Result};

/// Failure to inject into a mocked request
#[derive(Debug, Clone)]
pub enum MockFailure {
    Network,
    Status(u16, String),
    Parse,
}

impl MockFailure {
    fn to_error(&self) -> ApiError {
        match self {
            MockFailure::Network => ApiError::Network("Connection refused".to_string()),
            MockFailure::Status(status, message) => ApiError::Status {
                status: *status,
                message: message.clone(),
            },
            MockFailure::Parse => ApiError::Parse("expected value at line 1 column 1".to_string()),
        }
    }
}

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Mock transport. Unconfigured GETs return `[]`, unconfigured writes `{ok: true}`.
#[derive(Default)]
pub struct MockRiskClient {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    failures: Arc<Mutex<HashMap<String, MockFailure>>>,
    offline: Arc<Mutex<bool>>,
    delay: Arc<Mutex<Option<Duration>>>,
    calls: Arc<Mutex<Vec<CapturedCall>>>,
}

fn call_key(method: &Method, path: &str) -> String {
    format!("{} {}", method, path)
}

impl MockRiskClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `method path`
    pub async fn set_response(&self, method: Method, path: &str, body: Value) {
        self.responses
            .lock()
            .await
            .insert(call_key(&method, path), body);
    }

    /// Make `method path` fail until cleared
    pub async fn set_failure(&self, method: Method, path: &str, failure: MockFailure) {
        self.failures
            .lock()
            .await
            .insert(call_key(&method, path), failure);
    }

    pub async fn clear_failure(&self, method: Method, path: &str) {
        self.failures.lock().await.remove(&call_key(&method, path));
    }

    /// Fail every request with a network error while `offline` is set
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.lock().await = offline;
    }

    /// Sleep before answering each request
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    pub async fn calls(&self) -> Vec<CapturedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls made to `method path`
    pub async fn call_count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    async fn respond(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.calls.lock().await.push(CapturedCall {
            method: method.clone(),
            path: path.to_string(),
            body: body.cloned(),
        });

        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.offline.lock().await {
            return Err(MockFailure::Network.to_error().into());
        }

        let key = call_key(&method, path);
        if let Some(failure) = self.failures.lock().await.get(&key) {
            return Err(failure.to_error().into());
        }

        if let Some(body) = self.responses.lock().await.get(&key) {
            return Ok(body.clone());
        }

        Ok(if method == Method::GET {
            json!([])
        } else {
            json!({ "ok": true })
        })
    }
}

#[async_trait]
impl RiskApi for MockRiskClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.respond(Method::GET, path, None).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.respond(method, path, body).await
    }
}

//! reqwest-based backend client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use serde_json::Value;

use super::RiskApi;
use crate::error::{ApiError, Result};

/// Default backend base URL (the Express dev server)
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Every request carries this timeout unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the Risk Index REST backend
pub struct HttpClient {
    http: ReqwestClient,
    base_url: String,
}

impl HttpClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_inner(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        if status.is_success() {
            return decode_body(&text);
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(status, &text),
        }
        .into())
    }
}

/// Decode a 2xx body; an empty body decodes as `null`
fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()).into())
}

/// Pull `error` or `message` out of an error body, falling back to the status
fn error_message(status: StatusCode, text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| {
            ["error", "message"]
                .iter()
                .find_map(|field| body.get(*field).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl RiskApi for HttpClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.request_inner(Method::GET, path, None).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.request_inner(method, path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_client_creation_trims_slash() {
        let client = HttpClient::new("http://localhost:3001/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_error_message_prefers_error_field() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"ok":false,"error":"Bad id"}"#);
        assert_eq!(msg, "Bad id");
    }

    #[test]
    fn test_error_message_uses_message_field() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"message":"No such region"}"#);
        assert_eq!(msg, "No such region");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let msg = error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(msg, "HTTP 500");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body("").unwrap(), Value::Null);
        assert_eq!(decode_body(r#"{"ok":true}"#).unwrap(), json!({"ok": true}));

        let err = decode_body("not json").unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_get_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/buttons")
            .with_status(200)
            .with_body(r#"[{"id":1,"label":"SOS"}]"#)
            .create_async()
            .await;

        let client = HttpClient::new(&server.url(), DEFAULT_TIMEOUT).unwrap();
        let body = client.get("/api/buttons").await.unwrap();
        assert_eq!(body[0]["label"], json!("SOS"));
    }

    #[tokio::test]
    async fn test_status_error_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/shift_day")
            .with_status(500)
            .with_body(r#"{"ok":false,"error":"database locked"}"#)
            .create_async()
            .await;

        let client = HttpClient::new(&server.url(), DEFAULT_TIMEOUT).unwrap();
        let err = client
            .send(Method::POST, "/api/shift_day", Some(&json!({"id": 1})))
            .await
            .unwrap_err();

        match err {
            Error::Api(ApiError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "database locked");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = HttpClient::new("http://127.0.0.1:9", DEFAULT_TIMEOUT).unwrap();
        let err = client.get("/api/buttons").await.unwrap_err();
        assert!(err.is_connectivity());
    }
}

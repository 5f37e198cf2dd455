//! Error types for riskop

use thiserror::Error;

/// Result type alias for riskop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl Error {
    /// Whether this error means the backend could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Api(ApiError::Network(_)))
    }
}

/// Backend-related errors.
///
/// The `Display` text of each variant is what ends up in the `error` field
/// of a failed `WriteResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never reached the server, the connection dropped, or it timed out
    #[error("Network Error: {0}")]
    Network(String),

    /// Non-2xx status; `message` is the body's `error`/`message` or `HTTP <status>`
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Body was not valid JSON or did not match the expected shape
    #[error("Parse Error: {0}")]
    Parse(String),

    /// Server answered 2xx but with `{ok: false}`
    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to backend".to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Offline store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Offline store I/O error: {0}")]
    Io(String),

    #[error("Offline store database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Offline store payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Offline store is not available")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_message() {
        let err = ApiError::Network("Connection refused".to_string());
        assert_eq!(err.to_string(), "Network Error: Connection refused");
    }

    #[test]
    fn test_parse_error_message() {
        let err = ApiError::Parse("expected value at line 1".to_string());
        assert!(err.to_string().starts_with("Parse Error: "));
    }

    #[test]
    fn test_status_error_uses_message() {
        let err = ApiError::Status {
            status: 500,
            message: "HTTP 500".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn test_rejected_is_plain_message() {
        let err = ApiError::Rejected("Region not found".to_string());
        assert_eq!(err.to_string(), "Region not found");
    }

    #[test]
    fn test_is_connectivity() {
        let err: Error = ApiError::Network("down".to_string()).into();
        assert!(err.is_connectivity());

        let err: Error = ApiError::Status {
            status: 503,
            message: "Service unavailable".to_string(),
        }
        .into();
        assert!(!err.is_connectivity());
    }

    #[test]
    fn test_store_error_from_sqlite() {
        let err: StoreError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: [yaml: content")
            .unwrap_err();
        let config_err: ConfigError = yaml_err.into();
        assert!(matches!(config_err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_error_from_store_error() {
        let err: Error = StoreError::Unavailable.into();
        assert!(matches!(err, Error::Store(StoreError::Unavailable)));
    }
}

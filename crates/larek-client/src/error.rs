//! # Client Error Types
//!
//! Error types for network and configuration operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     API                 │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Api { status, msg }    │ │
//! │  │  InvalidUrl     │  │  (DNS, TLS,     │  │  Json                   │ │
//! │  │  ConfigLoad/Save│  │   timeout)      │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport / API Errors
    // =========================================================================
    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    ///
    /// `message` is the body's `error` field when the API sent one, else the
    /// raw body.
    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// Response body could not be deserialized.
    #[error("Unexpected response: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Short text suitable for `order:failure` / `catalog:failed`.
    ///
    /// API errors surface the server's own message; everything else uses the
    /// full display form.
    pub fn reason(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_prefers_api_message() {
        let err = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "Неверная сумма заказа".into(),
        };
        assert_eq!(err.reason(), "Неверная сумма заказа");
        assert_eq!(err.to_string(), "API error 400 Bad Request: Неверная сумма заказа");

        let err = ClientError::InvalidConfig("timeout_secs must be greater than 0".into());
        assert_eq!(err.reason(), err.to_string());
    }

    #[test]
    fn test_reason_falls_back_to_display_for_empty_body() {
        let err = ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: String::new(),
        };
        assert_eq!(err.reason(), "API error 502 Bad Gateway: ");
    }
}

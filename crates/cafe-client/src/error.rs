//! # Client Error Types
//!
//! Error types for everything that crosses the network or the token store.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Http {status, msg,     │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │        errors[]}        │ │
//! │  │  ConfigLoad/Save│  │                 │  │  DeserializationFailed  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Storage      │  │     Domain      │  │      Unsupported        │ │
//! │  │  (StoreError)   │  │  (CoreError)    │  │  (delete product)       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use thiserror::Error;

use cafe_core::{CoreError, ValidationError};
use cafe_store::StoreError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure a manager can report.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Backend unreachable (DNS, refused, TLS, reset).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Non-success HTTP status.
    ///
    /// `message` is the body's `msg`; `errors` holds every `errors[].msg`.
    #[error("Backend returned {status}: {}", http_summary(.message, .errors))]
    Http {
        status: u16,
        message: Option<String>,
        errors: Vec<String>,
    },

    /// Response body did not match the expected shape.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Reading a local file (image upload).
    #[error("I/O error: {0}")]
    Io(String),

    /// Operation exists in the API surface but is not implemented.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn http_summary<'a>(message: &'a Option<String>, errors: &'a [String]) -> &'a str {
    message
        .as_deref()
        .or(errors.first().map(String::as_str))
        .unwrap_or("no message")
}

// =============================================================================
// Backend Error Body
// =============================================================================

/// Error body shape used by the backend.
///
/// ```json
/// { "msg": "Usuario / Password no son correctos" }
/// { "errors": [ { "msg": "El correo ya está registrado", "param": "correo" } ] }
/// ```
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BackendErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub errors: Vec<BackendFieldError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BackendFieldError {
    #[serde(default)]
    pub msg: Option<String>,
}

impl ClientError {
    /// Builds an `Http` error from a status and a raw body.
    ///
    /// Bodies that are not JSON (proxies, HTML error pages) yield no messages.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: BackendErrorBody = serde_json::from_str(body).unwrap_or_default();

        ClientError::Http {
            status,
            message: parsed.msg.filter(|m| !m.is_empty()),
            errors: parsed
                .errors
                .into_iter()
                .filter_map(|e| e.msg)
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// The backend's top-level `msg`, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The first `errors[].msg`, if any.
    pub fn first_field_error(&self) -> Option<&str> {
        match self {
            ClientError::Http { errors, .. } => errors.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::DeserializationFailed(err.to_string())
        } else if err.is_builder() {
            ClientError::Internal(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: None,
                errors: Vec::new(),
            }
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DeserializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
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

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Domain(CoreError::Validation(err))
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if repeating the same request could succeed.
    ///
    /// ## Retryable Errors
    /// - Connection failures
    /// - Timeouts
    /// - 5xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout => true,
            ClientError::Http { status, .. } => *status >= 500,
            ClientError::Storage(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Returns true if the backend rejected the credentials or the token.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Http { status: 400 | 401 | 403, .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

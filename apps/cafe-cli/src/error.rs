//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Café CLI                           │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Form input bad? ──── ValidationError ──────────────┐                   │
//! │         │                                           │                   │
//! │         ▼                                           ▼                   │
//! │  Backend said no? ─── ClientError::Http ───────► ApiError ──► stderr    │
//! │         │                                           ▲       exit 1      │
//! │         ▼                                           │                   │
//! │  Token store? ──────── StoreError ──────────────────┘                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ──────────────────────────────────────────────────► stdout    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use cafe_client::ClientError;
use cafe_core::{CoreError, ValidationError};
use cafe_store::StoreError;

/// Error returned from CLI commands.
///
/// Commands return it as the error value; `cafe` reports it on stderr
/// and exits non-zero. Serialized, it reads:
/// ```json
/// {
///   "code": "AUTH_ERROR",
///   "message": "Usuario / Password no son correctos"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed, locally or by the backend (400)
    ValidationError,

    /// Credentials or token rejected (401 / 403)
    AuthError,

    /// Backend unreachable or timed out
    NetworkError,

    /// Backend failed (5xx) or answered with an unexpected body
    BackendError,

    /// Token store failed
    StorageError,

    /// Bad configuration file or environment
    ConfigError,

    /// Operation not offered by this client
    Unsupported,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AuthError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts client errors to API errors.
///
/// Backend messages (`msg`, `errors[0].msg`) are shown as-is.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        let backend_message = err
            .first_field_error()
            .or_else(|| err.backend_message())
            .map(str::to_string);

        match err {
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_) => {
                ApiError::new(ErrorCode::ConfigError, err.to_string())
            }
            ClientError::ConnectionFailed(_) | ClientError::Timeout => {
                ApiError::new(ErrorCode::NetworkError, err.to_string())
            }
            ClientError::Http { status, .. } => {
                let code = match status {
                    404 => ErrorCode::NotFound,
                    401 | 403 => ErrorCode::AuthError,
                    400..=499 => ErrorCode::ValidationError,
                    _ => ErrorCode::BackendError,
                };
                ApiError::new(code, backend_message.unwrap_or_else(|| err.to_string()))
            }
            ClientError::DeserializationFailed(e) => {
                tracing::error!("Unexpected backend response: {}", e);
                ApiError::new(ErrorCode::BackendError, "Unexpected response from backend")
            }
            ClientError::Storage(e) => ApiError::from(e),
            ClientError::Domain(e) => ApiError::from(e),
            ClientError::Io(e) => ApiError::validation(format!("Could not read file: {}", e)),
            ClientError::Unsupported(what) => ApiError::new(
                ErrorCode::Unsupported,
                format!("{} is not supported", what),
            ),
            ClientError::Internal(e) => {
                tracing::error!("Internal client error: {}", e);
                ApiError::internal("Internal error")
            }
        }
    }
}

/// Converts token store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Token store connection failed")
            }
            StoreError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Token store migration failed")
            }
            StoreError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Token store query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Token store operation failed")
            }
            StoreError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Token store pool exhausted")
            }
            StoreError::Internal(e) => {
                tracing::error!("Internal token store error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Token store operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoCategories => ApiError::validation(err.to_string()),
            CoreError::ProductNotSaved => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_uses_backend_message() {
        let err = ClientError::from_response(401, r#"{"msg":"Invalid credentials"}"#);
        let api: ApiError = err.into();

        assert_eq!(api.code, ErrorCode::AuthError);
        assert_eq!(api.message, "Invalid credentials");
    }

    #[test]
    fn test_http_error_prefers_field_error() {
        let err = ClientError::from_response(
            400,
            r#"{"msg":"general","errors":[{"msg":"El nombre es obligatorio"}]}"#,
        );
        let api: ApiError = err.into();

        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.message, "El nombre es obligatorio");
    }

    #[test]
    fn test_http_status_codes() {
        let not_found: ApiError = ClientError::from_response(404, "").into();
        let server: ApiError = ClientError::from_response(503, "<html>").into();

        assert_eq!(not_found.code, ErrorCode::NotFound);
        assert_eq!(server.code, ErrorCode::BackendError);
        assert!(server.message.contains("503"));
    }

    #[test]
    fn test_transport_errors() {
        let api: ApiError = ClientError::Timeout.into();
        assert_eq!(api.code, ErrorCode::NetworkError);
    }

    #[test]
    fn test_unsupported() {
        let api: ApiError = ClientError::Unsupported("delete product".to_string()).into();
        assert_eq!(api.code, ErrorCode::Unsupported);
        assert_eq!(api.message, "delete product is not supported");
    }

    #[test]
    fn test_store_error_hides_details() {
        let api: ApiError = StoreError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(api.code, ErrorCode::StorageError);
        assert!(!api.message.contains("disk"));
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::Required {
            field: "nombre".to_string(),
        };
        let api: ApiError = ClientError::Domain(CoreError::Validation(err)).into();

        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.message, "nombre is required");
    }

    #[test]
    fn test_serializes_code_and_message() {
        let json = serde_json::to_value(ApiError::auth("nope")).unwrap();
        assert_eq!(json["code"], "AUTH_ERROR");
        assert_eq!(json["message"], "nope");
    }
}

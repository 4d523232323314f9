//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cafe-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule failures                           │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  cafe-store errors (separate crate)                                    │
//! │  └── StoreError       - Token persistence failures                     │
//! │                                                                         │
//! │  cafe-client errors (separate crate)                                   │
//! │  └── ClientError      - Transport / HTTP / backend messages            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → ApiError → User     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Domain rule failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product form needs a category but the backend has none.
    #[error("No categories available to assign the product to")]
    NoCategories,

    /// An image can only be attached to a product that already has an id.
    #[error("Save the product before attaching an image")]
    ProductNotSaved,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "correo".to_string(),
        };
        assert_eq!(err.to_string(), "correo is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "nombre".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

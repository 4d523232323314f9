//! # Validation Module
//!
//! Form validation run before a request reaches the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (cafe-cli)                                      │
//! │  └── Collects form fields                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths                                          │
//! │  └── Ids safe to embed in a URL path                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Authoritative checks, returned as `msg` / `errors[].msg`          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::validation::{validate_email, validate_product_name};
//!
//! validate_email("a@b.com").unwrap();
//! validate_product_name("Latte").unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{LoginData, RegisterData};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 6;

const MAX_NAME_LEN: usize = 100;

// =============================================================================
// Credentials
// =============================================================================

/// Validates a login identifier.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with a non-empty local part and a dotted domain
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "correo".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "correo".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a password for registration.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a person's display name.
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    validate_name("nombre", name)
}

/// Login only requires both fields to be present; the backend decides the rest.
pub fn validate_login(data: &LoginData) -> ValidationResult<()> {
    validate_email(&data.email)?;
    if data.password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

pub fn validate_registration(data: &RegisterData) -> ValidationResult<()> {
    validate_user_name(&data.name)?;
    validate_email(&data.email)?;
    validate_password(&data.password)
}

// =============================================================================
// Catalog
// =============================================================================

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Flat White").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("nombre", name)
}

/// Validates a backend id before it is placed in a URL path.
///
/// ## Rules
/// - Must not be empty
/// - No whitespace or URL delimiters (`/ ? # %`)
/// - Not a dot segment (`.`, `..`), which URL resolution would swallow
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace or URL delimiters".to_string(),
        });
    }

    if id.chars().all(|c| c == '.') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not be made only of dots".to_string(),
        });
    }

    Ok(())
}

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("  barista@cafe.co  ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@@b.com").is_err());
        assert!(validate_email("a b@c.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(matches!(
            validate_password("12345"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_login_allows_short_password() {
        // Short passwords are the backend's call at login time.
        assert!(validate_login(&LoginData::new("a@b.com", "bad")).is_ok());
        assert!(validate_login(&LoginData::new("a@b.com", "")).is_err());
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration(&RegisterData::new("a@b.com", "123456", "Ana")).is_ok());
        assert!(validate_registration(&RegisterData::new("a@b.com", "123456", "")).is_err());
        assert!(validate_registration(&RegisterData::new("a@b.com", "123", "Ana")).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Latte").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("id", "p9").is_ok());
        assert!(validate_id("id", "5f8d0d55b54764421b7156c9").is_ok());

        assert!(validate_id("id", "").is_err());
        assert!(validate_id("id", "a/b").is_err());
        assert!(validate_id("id", "a b").is_err());
        assert!(validate_id("id", "x?limite=1").is_err());
    }

    #[test]
    fn test_validate_id_rejects_dot_segments() {
        assert!(validate_id("id", ".").is_err());
        assert!(validate_id("id", "..").is_err());
        assert!(validate_id("id", "...").is_err());

        assert!(validate_id("id", "p.9").is_ok());
        assert!(validate_id("id", ".p9").is_ok());
    }
}

//! # Validation Module
//!
//! Input validation for catalog requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum)                                        │
//! │  └── JSON shape / type checks (deserialization)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Name length 1..=120 characters                                    │
//! │  └── Identifier format (UUID)                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key + ON DELETE CASCADE                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before the store is touched, so a rejected request
//! never mutates anything.

use crate::error::ValidationError;
use crate::{MAX_NAME_LENGTH, MAX_SEARCH_LENGTH, MAX_USERNAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or variant name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 120 characters (counted as chars, not bytes)
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_name;
///
/// assert_eq!(validate_name("  Classic Shoes ").unwrap(), "Classic Shoes");
/// assert!(validate_name("").is_err());
/// assert!(validate_name(&"A".repeat(121)).is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

/// Validates the name of a partial update.
///
/// `None` means "leave the name alone"; a present but empty name is still
/// rejected.
pub fn validate_optional_name(name: Option<&str>) -> ValidationResult<Option<String>> {
    name.map(validate_name).transpose()
}

/// Validates a username for login.
pub fn validate_username(username: &str) -> ValidationResult<String> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LENGTH,
        });
    }

    Ok(username.to_string())
}

/// Validates a variant search term.
///
/// ## Returns
/// `None` for a blank term (no filtering), otherwise the trimmed term.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    if query.is_empty() {
        return Ok(None);
    }

    Ok(Some(query.to_string()))
}

/// Folds text for case-insensitive matching.
///
/// Stored search columns and search patterns both go through this, so the
/// comparison never depends on SQLite's ASCII-only `lower()`.
///
/// ```rust
/// use catalog_core::validation::search_key;
///
/// assert_eq!(search_key("ÉTÉ Édition"), "été édition");
/// ```
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID and returns it in the stored form (lowercase, hyphenated).
///
/// Uppercase, braced and hyphen-less spellings are accepted and normalized.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_uuid;
///
/// assert_eq!(
///     validate_uuid("productId", "550E8400E29B41D4A716446655440000").unwrap(),
///     "550e8400-e29b-41d4-a716-446655440000"
/// );
/// assert!(validate_uuid("productId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let parsed = uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(parsed.hyphenated().to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

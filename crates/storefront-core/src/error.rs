//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Codec / domain errors                          │
//! │  └── ValidationError  - Field-level validation failures                │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  app errors                                                            │
//! │  ├── StorageError     - Persistence backend failures                   │
//! │  └── ApiError         - What the view layer sees                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → (logged) → empty cart             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart operations themselves never fail. These errors only surface from the
//! codec and validation helpers, and the store recovers from them locally.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core cart errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Persisted cart record could not be parsed.
    ///
    /// ## When This Occurs
    /// - Stored value is not JSON
    /// - `items` is missing
    /// - A line item lacks a required field or has the wrong type
    #[error("Malformed cart record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    /// A line item in a persisted record violates a cart invariant.
    #[error("Invalid line item at position {index}: {source}")]
    InvalidLineItem {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: 10,
        };
        assert_eq!(err.to_string(), "price must be between 0 and 10");
    }

    #[test]
    fn test_invalid_line_item_message() {
        let err = CoreError::InvalidLineItem {
            index: 2,
            source: ValidationError::MustBePositive {
                field: "quantity".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid line item at position 2: quantity must be positive"
        );
    }

    #[test]
    fn test_json_error_converts_to_core_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::MalformedRecord(_)));
    }
}

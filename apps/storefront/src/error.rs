//! # API Error Type
//!
//! Unified error type for cart commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Command Function                                                      │
//! │  Result<T, ApiError>                                                   │
//! │         │                                                               │
//! │         ├── Unknown product? ──── ApiError::not_found ─────────┐       │
//! │         ├── Out of stock? ─────── ErrorCode::OutOfStock ───────┤       │
//! │         ├── Bad variant? ──────── ErrorCode::ValidationError ──┼──► caller
//! │         ├── Invalid item? ─────── From<ValidationError> ───────┤       │
//! │         ├── Config render? ────── ErrorCode::Internal ─────────┘       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────────►    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store operations themselves never fail; everything here comes from the
//! command layer around them.

use serde::Serialize;
use storefront_core::ValidationError;

/// Error returned from cart commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "OUT_OF_STOCK",
///   "message": "Nike Blazer Mid '77 Vintage is out of stock"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Product cannot be added: no stock left
    OutOfStock,

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

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates an out-of-stock error.
    pub fn out_of_stock(product_name: &str) -> Self {
        ApiError::new(ErrorCode::OutOfStock, format!("{} is out of stock", product_name))
    }
}

/// Converts validation failures (`?` on `validate_*`) to API errors.
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
    fn test_serialized_shape() {
        let err = ApiError::out_of_stock("Blazer");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "OUT_OF_STOCK");
        assert_eq!(json["message"], "Blazer is out of stock");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: ApiError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must be positive");
    }

    #[test]
    fn test_display() {
        let err = ApiError::not_found("Product", "999");
        assert_eq!(err.to_string(), "[NotFound] Product not found: 999");
    }
}

//! # Validation Module
//!
//! Field validation for line items. The cart applies the same rules when an
//! item is added and when a persisted record is read back, so anything the
//! cart accepts survives a save and reload.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (product card / detail panel)                         │
//! │  ├── Out-of-stock products cannot be added                             │
//! │  └── Quantity picker clamps to 1..=stock                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart::add_item                                               │
//! │  └── validate_line_item: invalid items never enter the cart            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Codec                                                        │
//! │  └── Persisted records are untrusted: every item is re-checked         │
//! │      with the same validate_line_item before it is let back in         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Size};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name a line item may carry.
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest quantity a single line item may hold. Merges and updates clamp
/// to it, which keeps every cart total far from `i64` overflow.
pub const MAX_QUANTITY: i64 = 9_999;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name snapshot.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
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

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must be at most [`MAX_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates that a variant was actually selected.
pub fn validate_variant(size: &Size, color: &str) -> ValidationResult<()> {
    if size.is_empty() {
        return Err(ValidationError::Required {
            field: "selectedSize".to_string(),
        });
    }

    if color.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "selectedColor".to_string(),
        });
    }

    Ok(())
}

/// Runs every field check against a line item.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_product_name(&item.name)?;
    validate_price(item.price)?;
    validate_variant(&item.selected_size, &item.selected_color)?;
    validate_quantity(item.quantity)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Trail Runner").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_product_name(&"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(matches!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(1099)).is_ok());
        assert!(validate_price(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_variant() {
        assert!(validate_variant(&Size::from("9"), "red").is_ok());
        assert!(validate_variant(&Size::from("  "), "red").is_err());
        assert!(validate_variant(&Size::from("M"), "").is_err());
    }

    #[test]
    fn test_validate_line_item() {
        let good = LineItem::new(ProductId::new(1), "Runner", Money::from_cents(100), "9", "red", 1);
        assert!(validate_line_item(&good).is_ok());

        let mut bad = good.clone();
        bad.quantity = 0;
        assert!(matches!(
            validate_line_item(&bad),
            Err(ValidationError::MustBePositive { .. })
        ));

        let mut bad = good;
        bad.price = Money::from_cents(-1);
        assert!(matches!(
            validate_line_item(&bad),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}

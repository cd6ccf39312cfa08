//! # Validation Module
//!
//! Input validation utilities for the cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller input                                                 │
//! │  └── validate_amount, validate_product_id                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stock check against the inventory                            │
//! │  └── Cart::check_stock                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Restored snapshots                                           │
//! │  └── validate_cart_items (unique ids, positive amounts)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rocket_core::validation::{validate_amount, validate_product_id};
//!
//! validate_product_id(1).unwrap();
//! validate_amount(2).unwrap();
//! assert!(validate_amount(0).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{CartItem, ProductId};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a cart amount.
///
/// ## Rules
/// - Must be at least 1 (a zero amount is a removal, never a stored line)
pub fn validate_amount(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a product identifier.
///
/// Inventory identifiers start at 1.
pub fn validate_product_id(id: ProductId) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "productId".to_string(),
        });
    }

    Ok(())
}

/// Validates a full list of cart lines.
///
/// ## Rules
/// - Every amount is at least 1
/// - No two lines share a product id
///
/// Used when restoring a snapshot written by an older build or edited by
/// hand.
pub fn validate_cart_items(items: &[CartItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_amount(item.amount)?;

        if !seen.insert(item.id) {
            return Err(ValidationError::Duplicate {
                field: "productId".to_string(),
                value: item.id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ProductId, amount: i64) -> CartItem {
        CartItem {
            id,
            title: format!("Product {}", id),
            price: 99.9,
            image: String::new(),
            amount,
        }
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(42).is_ok());

        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-1).is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id(1).is_ok());
        assert!(validate_product_id(0).is_err());
        assert!(validate_product_id(-7).is_err());
    }

    #[test]
    fn test_validate_cart_items() {
        assert!(validate_cart_items(&[]).is_ok());
        assert!(validate_cart_items(&[item(1, 1), item(2, 5)]).is_ok());

        assert!(matches!(
            validate_cart_items(&[item(1, 1), item(1, 2)]),
            Err(ValidationError::Duplicate { .. })
        ));
        assert!(matches!(
            validate_cart_items(&[item(1, 0)]),
            Err(ValidationError::MustBePositive { .. })
        ));
    }
}

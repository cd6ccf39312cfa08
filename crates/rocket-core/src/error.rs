//! # Error Types
//!
//! Domain-specific error types for rocket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rocket-core errors (this file)                                        │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rocket-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  apps/cart errors                                                      │
//! │  ├── CartError        - What cart callers see                          │
//! │  └── ApiError         - Serialized for command output                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → ApiError              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested amount is above the available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to cart (cart has 2, stock is 2)
    ///      │
    ///      ▼
    /// candidate = 3 > available = 2
    ///      │
    ///      ▼
    /// OutOfStock { product_id: 1, available: 2, requested: 3 }
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    ProductNotFound(ProductId),

    /// Amount is zero or negative.
    #[error("Invalid amount {0}: must be at least 1")]
    InvalidAmount(i64),

    /// Cart lines could not be encoded, decoded or validated as a snapshot.
    #[error("Invalid cart snapshot: {0}")]
    InvalidSnapshot(String),
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::InvalidSnapshot(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Duplicate value (e.g., two cart lines for one product).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            product_id: 1,
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 1: available 2, requested 3"
        );

        assert_eq!(
            CoreError::ProductNotFound(9).to_string(),
            "Product 9 is not in the cart"
        );
    }

    #[test]
    fn test_validation_converts_to_snapshot_error() {
        let validation_err = ValidationError::Duplicate {
            field: "productId".to_string(),
            value: "1".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidSnapshot(_)));
        assert_eq!(
            core_err.to_string(),
            "Invalid cart snapshot: productId '1' already exists"
        );
    }
}

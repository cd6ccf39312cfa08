//! # Error Types
//!
//! Service-level cart errors and the serialized error the command layer
//! prints.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cart Service                       │
//! │                                                                         │
//! │  InventoryError ──┐                                                     │
//! │                   ├──► CartError ──► notifier (user message)            │
//! │  CoreError ───────┤        │                                            │
//! │                   │        └──────► ApiError { code, message }          │
//! │  StoreError ──────┘                                                     │
//! │                                                                         │
//! │  Callers never see raw inventory or storage errors, only the five       │
//! │  CartError kinds.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rocket_core::{CoreError, ProductId};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::inventory::InventoryError;
use crate::store::StoreError;

// =============================================================================
// Cart Error
// =============================================================================

/// Outcome of a failed cart operation.
#[derive(Debug, Error)]
pub enum CartError {
    /// Inventory unreachable, or the product id could not be resolved.
    ///
    /// Cart unchanged.
    #[error("Lookup failed for product {product_id}: {reason}")]
    LookupFailed { product_id: ProductId, reason: String },

    /// Requested amount exceeds the available stock.
    ///
    /// Cart unchanged.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// The product is not in the cart.
    ///
    /// Cart unchanged.
    #[error("Product {0} is not in the cart")]
    ProductNotFound(ProductId),

    /// Amount is zero or negative. Rejected before any lookup.
    #[error("Invalid amount {0}: must be at least 1")]
    InvalidAmount(i64),

    /// The in-memory cart changed but the snapshot write failed.
    ///
    /// ## State After This Error
    /// ```text
    /// memory  : updated
    /// storage : previous snapshot (stale until the next successful write)
    /// ```
    #[error("Cart snapshot could not be saved: {0}")]
    PersistenceWriteFailed(String),
}

/// Programmatic discriminant of [`CartError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartErrorKind {
    LookupFailed,
    OutOfStock,
    ProductNotFound,
    InvalidAmount,
    PersistenceWriteFailed,
}

impl CartError {
    /// Creates a LookupFailed error.
    pub fn lookup(product_id: ProductId, reason: impl ToString) -> Self {
        CartError::LookupFailed {
            product_id,
            reason: reason.to_string(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> CartErrorKind {
        match self {
            CartError::LookupFailed { .. } => CartErrorKind::LookupFailed,
            CartError::OutOfStock { .. } => CartErrorKind::OutOfStock,
            CartError::ProductNotFound(_) => CartErrorKind::ProductNotFound,
            CartError::InvalidAmount(_) => CartErrorKind::InvalidAmount,
            CartError::PersistenceWriteFailed(_) => CartErrorKind::PersistenceWriteFailed,
        }
    }

    /// Message shown to the shopper. One distinct message per kind.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            CartErrorKind::LookupFailed => "Could not load product information, please try again",
            CartErrorKind::OutOfStock => "Requested quantity is out of stock",
            CartErrorKind::ProductNotFound => "This product is not in your cart",
            CartErrorKind::InvalidAmount => "Quantity must be at least 1",
            CartErrorKind::PersistenceWriteFailed => {
                "Your cart was updated but could not be saved on this device"
            }
        }
    }
}

impl From<CoreError> for CartError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OutOfStock {
                product_id,
                available,
                requested,
            } => CartError::OutOfStock {
                product_id,
                available,
                requested,
            },
            CoreError::ProductNotFound(id) => CartError::ProductNotFound(id),
            CoreError::InvalidAmount(amount) => CartError::InvalidAmount(amount),
            // Only the encode step of a write can produce this on a live cart
            CoreError::InvalidSnapshot(reason) => CartError::PersistenceWriteFailed(reason),
        }
    }
}

impl From<StoreError> for CartError {
    fn from(err: StoreError) -> Self {
        CartError::PersistenceWriteFailed(err.to_string())
    }
}

/// Result type for cart operations.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// API Error
// =============================================================================

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Requested quantity is out of stock"
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
    /// Product not in the cart
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Insufficient stock
    InsufficientStock,

    /// Inventory lookup failed
    LookupFailed,

    /// Snapshot storage failed
    PersistenceError,

    /// Configuration could not be loaded
    ConfigError,

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

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts cart errors to API errors.
impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        let code = match err.kind() {
            CartErrorKind::LookupFailed => ErrorCode::LookupFailed,
            CartErrorKind::OutOfStock => ErrorCode::InsufficientStock,
            CartErrorKind::ProductNotFound => ErrorCode::NotFound,
            CartErrorKind::InvalidAmount => ErrorCode::ValidationError,
            CartErrorKind::PersistenceWriteFailed => ErrorCode::PersistenceError,
        };
        ApiError::new(code, err.user_message())
    }
}

/// Converts inventory errors outside of cart operations (product listing).
impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        tracing::error!("Inventory request failed: {}", err);
        ApiError::new(
            ErrorCode::LookupFailed,
            "Could not load products, please try again",
        )
    }
}

/// Converts store errors raised while opening the database.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Storage failed: {}", err);
        ApiError::new(ErrorCode::PersistenceError, "Local storage is unavailable")
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

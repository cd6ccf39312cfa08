//! # Domain Types
//!
//! Types shared between the inventory API, the cart and the storefront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Stock       │   │    CartItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  title          │   │  amount (>= 0)  │   │  title, price   │       │
//! │  │  price          │   └─────────────────┘   │  image          │       │
//! │  │  image          │                         │  amount (>= 1)  │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  GET /products/:id ──► Product     GET /stock/:id ──► Stock            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names match the inventory API's JSON so the types deserialize
//! straight from responses and serialize into the snapshot format.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier of a product in the inventory.
pub type ProductId = i64;

// =============================================================================
// Product
// =============================================================================

/// A product as listed by the inventory API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Inventory identifier.
    #[ts(type = "number")]
    pub id: ProductId,

    /// Display title.
    pub title: String,

    /// Unit price as published by the inventory. Display metadata only.
    pub price: f64,

    /// Image URL.
    pub image: String,
}

// =============================================================================
// Stock
// =============================================================================

/// Units available for a product at the moment it was read.
///
/// Never cached: each cart operation that needs stock fetches it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Stock {
    /// Product this stock entry belongs to.
    #[ts(type = "number")]
    pub id: ProductId,

    /// Units available.
    #[ts(type = "number")]
    pub amount: i64,
}

// =============================================================================
// Cart Item
// =============================================================================

/// One line of the cart.
///
/// ## Design Notes
/// `title`, `price` and `image` are frozen copies taken from the inventory
/// when the product is first added. Later increments only touch `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Product identifier, unique within a cart.
    #[ts(type = "number")]
    pub id: ProductId,

    /// Title at time of adding (frozen).
    pub title: String,

    /// Price at time of adding (frozen).
    pub price: f64,

    /// Image at time of adding (frozen).
    pub image: String,

    /// Quantity in cart, always at least 1.
    #[ts(type = "number")]
    pub amount: i64,
}

impl CartItem {
    /// Creates a cart line from a product and an amount.
    pub fn from_product(product: &Product, amount: i64) -> Self {
        CartItem {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            amount,
        }
    }

    /// Line total (unit price × amount).
    pub fn line_total(&self) -> f64 {
        self.price * self.amount as f64
    }
}

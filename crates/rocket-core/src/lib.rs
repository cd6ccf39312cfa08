//! # rocket-core: Pure Cart Logic for RocketShoes
//!
//! This crate holds the cart's data model and every state transition as
//! plain functions over owned data. Nothing in here touches the network,
//! the disk or the clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      RocketShoes Cart Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (product list, cart page)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          apps/cart: CartState (inventory + store + notifier)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rocket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   cart    │  │ validation│                  │   │
//! │  │   │  Product  │  │   Cart    │  │   rules   │                  │   │
//! │  │   │  Stock    │  │ snapshot  │  │  checks   │                  │   │
//! │  │   │  CartItem │  │  totals   │  │           │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Stock, CartItem)
//! - [`cart`] - The cart collection, its transitions and snapshot codec
//! - [`error`] - Domain error types
//! - [`validation`] - Input and snapshot validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rocket_core::{Cart, Product, Stock};
//!
//! let product = Product {
//!     id: 1,
//!     title: "Tênis de Caminhada Leve Confortável".to_string(),
//!     price: 179.9,
//!     image: "https://example.com/1.jpg".to_string(),
//! };
//! let stock = Stock { id: 1, amount: 3 };
//!
//! let mut cart = Cart::new();
//! let candidate = cart.next_amount_for_add(product.id, &stock).unwrap();
//! cart.upsert(&product, candidate).unwrap();
//!
//! assert_eq!(cart.find(1).map(|item| item.amount), Some(1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key under which the cart snapshot is persisted.
///
/// The namespace prefix keeps the key distinct from anything else the
/// storefront keeps in the same store.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

//! # Commands Module
//!
//! Front-end facing operations. Each command takes the state it needs,
//! runs one cart or catalog operation and returns a serializable response
//! or an [`ApiError`](crate::error::ApiError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── product.rs  ◄─── Product listing with in-cart amounts
//! └── cart.rs     ◄─── Cart manipulation
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! async fn get_cart(cart: &CartState)
//!
//! // Needs the catalog and the cart
//! async fn list_products(inventory: &dyn InventoryClient, cart: &CartState)
//! ```

pub mod cart;
pub mod product;

//! # Cart Commands
//!
//! Commands for cart manipulation. Every command answers with the full
//! cart so the caller can redraw without a second round trip.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐   add_to_cart    ┌──────────┐                             │
//! │  │  Empty   │─────────────────►│ In Cart  │◄──┐ add_to_cart             │
//! │  │  Cart    │                  │          │───┘ update_cart_item        │
//! │  └──────────┘◄─────────────────└──────────┘     remove_from_cart        │
//! │       ▲         clear_cart /                                            │
//! │       │         last remove                                             │
//! │       │                                                                 │
//! │  restored from the snapshot on every start                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rocket_core::{Cart, CartItem, CartTotals, ProductId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::CartState;

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Gets the current cart contents.
///
/// ## Output
/// ```json
/// {
///   "items": [
///     { "id": 1, "title": "Tênis de Caminhada", "price": 179.9, "image": "…", "amount": 2 }
///   ],
///   "totals": { "itemCount": 1, "totalQuantity": 2, "subtotal": 359.8 }
/// }
/// ```
pub async fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c)).await
}

/// Adds one unit of a product to the cart.
///
/// ## Behavior
/// - If product already in cart: amount increases by one
/// - If product not in cart: added with amount 1
/// - Stock is checked against the inventory on every call
pub async fn add_to_cart(
    cart: &CartState,
    product_id: ProductId,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, "add_to_cart command");
    cart.add_product(product_id).await?;
    Ok(get_cart(cart).await)
}

/// Sets the amount of a product already in the cart.
pub async fn update_cart_item(
    cart: &CartState,
    product_id: ProductId,
    amount: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, amount, "update_cart_item command");
    cart.update_product_amount(product_id, amount).await?;
    Ok(get_cart(cart).await)
}

/// Removes a product from the cart.
pub async fn remove_from_cart(
    cart: &CartState,
    product_id: ProductId,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, "remove_from_cart command");
    cart.remove_product(product_id).await?;
    Ok(get_cart(cart).await)
}

/// Clears all items from the cart.
pub async fn clear_cart(cart: &CartState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");
    cart.clear().await?;
    Ok(get_cart(cart).await)
}

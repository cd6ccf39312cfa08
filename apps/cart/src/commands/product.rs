//! # Product Commands
//!
//! Catalog listing for the storefront, each product badged with how many
//! units are already in the cart.

use rocket_core::Product;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::inventory::InventoryClient;
use crate::state::CartState;

/// Product listing row.
///
/// ## Serialization
/// The product fields are flattened next to `amountInCart`:
/// ```json
/// { "id": 1, "title": "…", "price": 179.9, "image": "…", "amountInCart": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,

    /// Units of this product in the cart, 0 when absent.
    pub amount_in_cart: i64,
}

/// Lists the catalog with in-cart amounts.
pub async fn list_products(
    inventory: &dyn InventoryClient,
    cart: &CartState,
) -> Result<Vec<ProductListing>, ApiError> {
    debug!("list_products command");

    let products = inventory.list_products().await?;
    let amounts = cart.cart_items_amount().await;

    info!(count = products.len(), "Products listed");

    Ok(products
        .into_iter()
        .map(|product| {
            let amount_in_cart = amounts.get(&product.id).copied().unwrap_or(0);
            ProductListing {
                product,
                amount_in_cart,
            }
        })
        .collect())
}

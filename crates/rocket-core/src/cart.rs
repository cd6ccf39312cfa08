//! # Cart
//!
//! The cart collection and its state transitions.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  Service Operation        Pure Steps (this file)                        │
//! │  ─────────────────        ──────────────────────                        │
//! │                                                                         │
//! │  add_product ──────────► next_amount_for_add ─► check_stock ─► upsert  │
//! │                                                                         │
//! │  update_product_amount ► find ─► check_stock ─► set_amount             │
//! │                                                                         │
//! │  remove_product ───────► remove                                        │
//! │                                                                         │
//! │  persist ──────────────► to_snapshot     restore ─► from_snapshot      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Format
//! The snapshot is the ordered item list as a JSON array:
//! ```json
//! [{"id":1,"title":"Tênis","price":179.9,"image":"https://…","amount":2}]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{CartItem, Product, ProductId, Stock};
use crate::validation::{validate_amount, validate_cart_items};

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by product id (adding the same product bumps `amount`)
/// - Every `amount` is at least 1
/// - Items keep their insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from existing lines, checking the invariants.
    ///
    /// Lines that break an invariant are reported as `InvalidSnapshot`.
    pub fn from_items(items: Vec<CartItem>) -> CoreResult<Self> {
        validate_cart_items(&items)?;
        Ok(Cart { items })
    }

    /// Returns the cart lines in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up the line for a product.
    pub fn find(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Amount the cart would hold after one more unit of `id` is added,
    /// checked against a stock reading.
    ///
    /// ## Returns
    /// - `Ok(amount)` when one more unit fits in stock
    /// - `Err(CoreError::OutOfStock)` otherwise, including when the line
    ///   already holds `i64::MAX`
    pub fn next_amount_for_add(&self, id: ProductId, stock: &Stock) -> CoreResult<i64> {
        let current = self.find(id).map_or(0, |item| item.amount);

        let next = current.checked_add(1).ok_or(CoreError::OutOfStock {
            product_id: id,
            available: stock.amount,
            requested: current,
        })?;
        Self::check_stock(id, next, stock)?;

        Ok(next)
    }

    /// Checks a requested amount against a stock reading.
    ///
    /// ## Returns
    /// - `Ok(())` when `requested <= stock.amount`
    /// - `Err(CoreError::OutOfStock)` otherwise
    pub fn check_stock(product_id: ProductId, requested: i64, stock: &Stock) -> CoreResult<()> {
        if requested > stock.amount {
            return Err(CoreError::OutOfStock {
                product_id,
                available: stock.amount,
                requested,
            });
        }

        Ok(())
    }

    /// Inserts a product or overwrites the amount of its existing line.
    ///
    /// ## Behavior
    /// - If product already in cart: amount is replaced, metadata kept
    /// - If product not in cart: appended with metadata copied from `product`
    pub fn upsert(&mut self, product: &Product, amount: i64) -> CoreResult<()> {
        validate_amount(amount).map_err(|_| CoreError::InvalidAmount(amount))?;

        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            item.amount = amount;
            return Ok(());
        }

        self.items.push(CartItem::from_product(product, amount));
        Ok(())
    }

    /// Sets the amount of a line that is already in the cart.
    pub fn set_amount(&mut self, id: ProductId, amount: i64) -> CoreResult<()> {
        validate_amount(amount).map_err(|_| CoreError::InvalidAmount(amount))?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;
        item.amount = amount;
        Ok(())
    }

    /// Removes the line for a product and returns it.
    pub fn remove(&mut self, id: ProductId) -> CoreResult<CartItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;

        Ok(self.items.remove(index))
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    ///
    /// Saturates at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, i| total.saturating_add(i.amount))
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Amount in cart per product id.
    ///
    /// Used by the product listing to badge each product with how many
    /// units are already in the cart.
    pub fn amounts_by_product(&self) -> BTreeMap<ProductId, i64> {
        self.items.iter().map(|i| (i.id, i.amount)).collect()
    }

    // =========================================================================
    // Snapshot Codec
    // =========================================================================

    /// Encodes the whole cart as snapshot text.
    pub fn to_snapshot(&self) -> CoreResult<String> {
        serde_json::to_string(&self.items).map_err(|e| CoreError::InvalidSnapshot(e.to_string()))
    }

    /// Decodes snapshot text into a cart.
    ///
    /// Fails with `InvalidSnapshot` when the text is not a list of cart
    /// lines or when the lines break the cart invariants.
    pub fn from_snapshot(snapshot: &str) -> CoreResult<Self> {
        let items: Vec<CartItem> = serde_json::from_str(snapshot)
            .map_err(|e| CoreError::InvalidSnapshot(e.to_string()))?;

        Cart::from_items(items)
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    #[ts(type = "number")]
    pub total_quantity: i64,
    pub subtotal: f64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: ProductId, price: f64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            price,
            image: format!("https://example.com/{}.jpg", id),
        }
    }

    #[test]
    fn test_next_amount_for_add() {
        let stock = Stock { id: 1, amount: 4 };
        let mut cart = Cart::new();
        assert_eq!(cart.next_amount_for_add(1, &stock).unwrap(), 1);

        cart.upsert(&test_product(1, 10.0), 3).unwrap();
        assert_eq!(cart.next_amount_for_add(1, &stock).unwrap(), 4);
        assert_eq!(cart.next_amount_for_add(2, &stock).unwrap(), 1);

        cart.set_amount(1, 4).unwrap();
        assert!(matches!(
            cart.next_amount_for_add(1, &stock),
            Err(CoreError::OutOfStock {
                available: 4,
                requested: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_next_amount_for_add_at_max_amount() {
        let stock = Stock {
            id: 1,
            amount: i64::MAX,
        };
        let mut cart = Cart::new();
        cart.upsert(&test_product(1, 10.0), i64::MAX).unwrap();

        assert!(matches!(
            cart.next_amount_for_add(1, &stock),
            Err(CoreError::OutOfStock {
                product_id: 1,
                requested: i64::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_total_quantity_saturates() {
        let mut cart = Cart::new();
        cart.upsert(&test_product(1, 1.0), i64::MAX).unwrap();
        cart.upsert(&test_product(2, 1.0), 5).unwrap();

        assert_eq!(cart.total_quantity(), i64::MAX);
    }

    #[test]
    fn test_check_stock() {
        let stock = Stock { id: 1, amount: 2 };
        assert!(Cart::check_stock(1, 2, &stock).is_ok());

        let err = Cart::check_stock(1, 3, &stock).unwrap_err();
        assert!(matches!(
            err,
            CoreError::OutOfStock {
                product_id: 1,
                available: 2,
                requested: 3
            }
        ));
    }

    #[test]
    fn test_upsert_keeps_order_and_metadata() {
        let mut cart = Cart::new();
        cart.upsert(&test_product(2, 10.0), 1).unwrap();
        cart.upsert(&test_product(1, 20.0), 1).unwrap();

        // Changed metadata on re-add does not overwrite the frozen copy
        let mut repriced = test_product(2, 99.0);
        repriced.title = "Renamed".to_string();
        cart.upsert(&repriced, 2).unwrap();

        let ids: Vec<_> = cart.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let item = cart.find(2).unwrap();
        assert_eq!(item.amount, 2);
        assert_eq!(item.price, 10.0);
        assert_eq!(item.title, "Product 2");
    }

    #[test]
    fn test_set_amount_is_not_additive() {
        let mut cart = Cart::new();
        cart.upsert(&test_product(5, 10.0), 3).unwrap();

        cart.set_amount(5, 1).unwrap();
        assert_eq!(cart.find(5).unwrap().amount, 1);

        assert!(matches!(
            cart.set_amount(5, 0),
            Err(CoreError::InvalidAmount(0))
        ));
        assert!(matches!(
            cart.set_amount(6, 2),
            Err(CoreError::ProductNotFound(6))
        ));
        assert_eq!(cart.find(5).unwrap().amount, 1);
    }

    #[test]
    fn test_remove_only_touches_target() {
        let mut cart = Cart::new();
        cart.upsert(&test_product(1, 10.0), 1).unwrap();
        cart.upsert(&test_product(2, 10.0), 2).unwrap();

        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(cart.item_count(), 1);
        assert!(cart.contains(2));

        assert!(matches!(cart.remove(1), Err(CoreError::ProductNotFound(1))));
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.upsert(&test_product(1, 10.0), 2).unwrap();
        cart.upsert(&test_product(2, 2.5), 4).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 6);
        assert!((totals.subtotal - 30.0).abs() < 1e-9);

        let amounts = cart.amounts_by_product();
        assert_eq!(amounts.get(&1), Some(&2));
        assert_eq!(amounts.get(&3), None);
    }

    #[test]
    fn test_snapshot_restores_identical_cart() {
        let mut cart = Cart::new();
        cart.upsert(&test_product(3, 219.9), 2).unwrap();
        cart.upsert(&test_product(1, 179.9), 1).unwrap();

        let snapshot = cart.to_snapshot().unwrap();
        assert!(snapshot.starts_with('['));

        let restored = Cart::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_snapshot_rejects_garbage_and_broken_invariants() {
        assert!(matches!(
            Cart::from_snapshot("not json"),
            Err(CoreError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            Cart::from_snapshot(r#"{"id": 1}"#),
            Err(CoreError::InvalidSnapshot(_))
        ));

        let duplicate = r#"[
            {"id":1,"title":"a","price":1.0,"image":"","amount":1},
            {"id":1,"title":"a","price":1.0,"image":"","amount":2}
        ]"#;
        assert!(matches!(
            Cart::from_snapshot(duplicate),
            Err(CoreError::InvalidSnapshot(_))
        ));

        let zero = r#"[{"id":1,"title":"a","price":1.0,"image":"","amount":0}]"#;
        assert!(Cart::from_snapshot(zero).is_err());
    }
}

//! # Cart State
//!
//! The authoritative shopping cart: in-memory lines, validated against the
//! inventory and mirrored to the persistent store after every mutation.
//!
//! ## Thread Safety
//! The cart sits behind a `tokio::sync::Mutex` that is held for the whole
//! validate → mutate → persist sequence of an operation. Concurrent callers
//! are served one at a time in arrival order and never see a half-applied
//! change.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Operation               Inventory            Cart Change   Write       │
//! │  ─────────               ─────────            ───────────   ─────       │
//! │                                                                         │
//! │  add_product(id) ──────► product + stock ───► +1 / append   yes         │
//! │                                                                         │
//! │  update_product_amount ► stock ─────────────► amount = n    yes         │
//! │                                                                         │
//! │  remove_product(id) ───► (none) ────────────► delete line   yes         │
//! │                                                                         │
//! │  clear() ──────────────► (none) ────────────► delete all    yes         │
//! │                                                                         │
//! │  get_cart() ───────────► (none) ────────────► (read only)   no          │
//! │                                                                         │
//! │  Any failure: cart unchanged, no write, one notification.               │
//! │  Exception:   PersistenceWriteFailed keeps the in-memory change.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Restore
//! The cart is rebuilt from the store when the state is opened. A missing
//! snapshot, a store read error, or a snapshot that does not decode into a
//! valid cart all yield an empty cart.

use std::collections::BTreeMap;
use std::sync::Arc;

use rocket_core::validation::{validate_amount, validate_product_id};
use rocket_core::{Cart, CartItem, CartTotals, ProductId, Stock, CART_STORAGE_KEY};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult};
use crate::inventory::InventoryClient;
use crate::notifier::Notifier;
use crate::store::PersistentStore;

/// Cart service state.
///
/// Collaborators are injected at construction so the same state runs
/// against the HTTP inventory and SQLite in the binary, and against
/// in-memory fakes in tests.
pub struct CartState {
    cart: Mutex<Cart>,
    inventory: Arc<dyn InventoryClient>,
    store: Arc<dyn PersistentStore>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
}

impl CartState {
    /// Opens the cart under the default storage key.
    pub async fn open(
        inventory: Arc<dyn InventoryClient>,
        store: Arc<dyn PersistentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::open_with_key(inventory, store, notifier, CART_STORAGE_KEY).await
    }

    /// Opens the cart stored under `storage_key`, restoring its snapshot.
    pub async fn open_with_key(
        inventory: Arc<dyn InventoryClient>,
        store: Arc<dyn PersistentStore>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let cart = restore_cart(store.as_ref(), &storage_key).await;

        info!(
            key = %storage_key,
            items = cart.item_count(),
            "Cart restored"
        );

        CartState {
            cart: Mutex::new(cart),
            inventory,
            store,
            notifier,
            storage_key,
        }
    }

    /// Key the snapshot is written under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns a copy of the cart lines in display order.
    pub async fn get_cart(&self) -> Vec<CartItem> {
        self.cart.lock().await.items().to_vec()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(CartTotals::from).await;
    /// ```
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Amount in the cart per product id.
    pub async fn cart_items_amount(&self) -> BTreeMap<ProductId, i64> {
        self.with_cart(Cart::amounts_by_product).await
    }

    /// Summary of the cart for display.
    pub async fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart)).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product not in cart: appended with amount 1 and the inventory's
    ///   title, price and image
    /// - Product already in cart: amount incremented in place
    /// - Resulting amount above stock: `OutOfStock`, cart unchanged
    ///
    /// ## Returns
    /// The line as it is after the add.
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<CartItem> {
        debug!(product_id, "add_product");
        let result = self.apply_add(product_id).await;
        self.finish("add_product", Some(product_id), result)
    }

    /// Removes a product's line entirely. Makes no inventory call.
    ///
    /// ## Returns
    /// The removed line.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<CartItem> {
        debug!(product_id, "remove_product");
        let result = self.apply_remove(product_id).await;
        self.finish("remove_product", Some(product_id), result)
    }

    /// Sets the amount of a line to exactly `amount`.
    ///
    /// ## Validation Order
    /// 1. `amount <= 0` → `InvalidAmount` (no lookup)
    /// 2. Product not in cart → `ProductNotFound` (no lookup)
    /// 3. `amount > stock` → `OutOfStock`
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> CartResult<CartItem> {
        debug!(product_id, amount, "update_product_amount");
        let result = self.apply_update(product_id, amount).await;
        self.finish("update_product_amount", Some(product_id), result)
    }

    /// Empties the cart and persists the empty snapshot.
    pub async fn clear(&self) -> CartResult<()> {
        debug!("clear");
        let result = self.apply_clear().await;
        self.finish("clear", None, result)
    }

    /// Replaces the in-memory cart with the stored snapshot.
    ///
    /// Uses the same fallbacks as opening: anything unreadable yields an
    /// empty cart.
    pub async fn reload(&self) -> Vec<CartItem> {
        let mut cart = self.cart.lock().await;
        *cart = restore_cart(self.store.as_ref(), &self.storage_key).await;
        info!(items = cart.item_count(), "Cart reloaded");
        cart.items().to_vec()
    }

    async fn apply_add(&self, product_id: ProductId) -> CartResult<CartItem> {
        validate_product_id(product_id).map_err(|e| CartError::lookup(product_id, e))?;

        let mut cart = self.cart.lock().await;

        let product = self
            .inventory
            .get_product(product_id)
            .await
            .map_err(|e| CartError::lookup(product_id, e))?;
        if product.id != product_id {
            return Err(CartError::lookup(
                product_id,
                format!("inventory answered with product {}", product.id),
            ));
        }

        let stock = self.fetch_stock(product_id).await?;

        let amount = cart.next_amount_for_add(product_id, &stock)?;
        cart.upsert(&product, amount)?;

        let item = line(&cart, product_id)?;
        self.persist(&cart).await?;
        Ok(item)
    }

    async fn apply_remove(&self, product_id: ProductId) -> CartResult<CartItem> {
        let mut cart = self.cart.lock().await;

        let removed = cart.remove(product_id)?;
        self.persist(&cart).await?;
        Ok(removed)
    }

    async fn apply_update(&self, product_id: ProductId, amount: i64) -> CartResult<CartItem> {
        validate_amount(amount).map_err(|_| CartError::InvalidAmount(amount))?;

        let mut cart = self.cart.lock().await;

        if !cart.contains(product_id) {
            return Err(CartError::ProductNotFound(product_id));
        }

        let stock = self.fetch_stock(product_id).await?;

        Cart::check_stock(product_id, amount, &stock)?;
        cart.set_amount(product_id, amount)?;

        let item = line(&cart, product_id)?;
        self.persist(&cart).await?;
        Ok(item)
    }

    async fn apply_clear(&self) -> CartResult<()> {
        let mut cart = self.cart.lock().await;

        cart.clear();
        self.persist(&cart).await
    }

    /// Reads the stock for a product. A reading for another product is a
    /// failed lookup, same as a product answer with the wrong id.
    async fn fetch_stock(&self, product_id: ProductId) -> CartResult<Stock> {
        let stock = self
            .inventory
            .get_stock(product_id)
            .await
            .map_err(|e| CartError::lookup(product_id, e))?;

        if stock.id != product_id {
            return Err(CartError::lookup(
                product_id,
                format!("inventory answered with stock for {}", stock.id),
            ));
        }

        Ok(stock)
    }

    /// Writes the full snapshot. Called with the cart lock held.
    async fn persist(&self, cart: &Cart) -> CartResult<()> {
        let snapshot = cart.to_snapshot()?;

        self.store
            .write(&self.storage_key, &snapshot)
            .await
            .map_err(|e| {
                warn!(key = %self.storage_key, error = %e, "Cart snapshot write failed");
                CartError::from(e)
            })
    }

    /// Logs the outcome and sends the single notification for a failure.
    fn finish<T>(
        &self,
        operation: &'static str,
        product_id: Option<ProductId>,
        result: CartResult<T>,
    ) -> CartResult<T> {
        match &result {
            Ok(_) => info!(operation, ?product_id, "Cart updated"),
            Err(err @ CartError::PersistenceWriteFailed(_)) => {
                warn!(operation, ?product_id, error = %err, "Cart updated in memory only");
                self.notifier.notify_warning(err.user_message());
            }
            Err(err) => {
                warn!(operation, ?product_id, kind = ?err.kind(), error = %err, "Cart operation rejected");
                self.notifier.notify_error(err.user_message());
            }
        }

        result
    }
}

/// Current line for a product that was just written.
fn line(cart: &Cart, product_id: ProductId) -> CartResult<CartItem> {
    cart.find(product_id)
        .cloned()
        .ok_or(CartError::ProductNotFound(product_id))
}

/// Reads and decodes the snapshot, falling back to an empty cart.
async fn restore_cart(store: &dyn PersistentStore, key: &str) -> Cart {
    match store.read(key).await {
        Ok(Some(snapshot)) => match Cart::from_snapshot(&snapshot) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable cart snapshot");
                Cart::new()
            }
        },
        Ok(None) => {
            debug!(key = %key, "No cart snapshot, starting empty");
            Cart::new()
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Cart snapshot could not be read, starting empty");
            Cart::new()
        }
    }
}

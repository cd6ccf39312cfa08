//! # Inventory Client
//!
//! Read-only lookups of product metadata and stock.
//!
//! ## API Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inventory API                                        │
//! │                                                                         │
//! │  GET {base_url}/products        ──► [Product, ...]                      │
//! │  GET {base_url}/products/:id    ──► Product { id, title, price, image } │
//! │  GET {base_url}/stock/:id       ──► Stock   { id, amount }              │
//! │                                                                         │
//! │  404             ──► InventoryError::NotFound                           │
//! │  other non-2xx   ──► InventoryError::Status                             │
//! │  connect/timeout ──► InventoryError::Unreachable                        │
//! │  bad JSON        ──► InventoryError::Malformed                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations ship here: [`HttpInventoryClient`] for the real API
//! and [`StaticInventory`], an in-memory catalog loaded from the same JSON
//! document the API serves (`{"products": [...], "stock": [...]}`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rocket_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::InventoryConfig;

// =============================================================================
// Errors
// =============================================================================

/// Inventory lookup failures.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Network failure or timeout.
    #[error("Inventory unreachable: {0}")]
    Unreachable(String),

    /// The inventory has no such record.
    #[error("{resource} {id} not found in inventory")]
    NotFound {
        resource: &'static str,
        id: ProductId,
    },

    /// Non-success status other than 404.
    #[error("Inventory returned status {0}")]
    Status(u16),

    /// The response body did not match the expected shape.
    #[error("Malformed inventory response: {0}")]
    Malformed(String),
}

/// Result type for inventory lookups.
pub type InventoryResult<T> = Result<T, InventoryError>;

// =============================================================================
// Client Trait
// =============================================================================

/// Source of product metadata and stock levels.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Fetches a single product.
    async fn get_product(&self, id: ProductId) -> InventoryResult<Product>;

    /// Fetches the current stock for a product.
    async fn get_stock(&self, id: ProductId) -> InventoryResult<Stock>;

    /// Lists every product in the catalog.
    async fn list_products(&self) -> InventoryResult<Vec<Product>>;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// Inventory client backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// Creates a client with the configured base URL and request timeout.
    pub fn new(config: &InventoryConfig) -> InventoryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InventoryError::Unreachable(e.to_string()))?;

        Ok(HttpInventoryClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &'static str,
        id: ProductId,
    ) -> InventoryResult<T> {
        let url = self.url(path);
        debug!(url = %url, "Inventory request");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| InventoryError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound { resource, id });
        }
        if !status.is_success() {
            return Err(InventoryError::Status(status.as_u16()));
        }

        resp.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                InventoryError::Malformed(e.to_string())
            } else {
                InventoryError::Unreachable(e.to_string())
            }
        })
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn get_product(&self, id: ProductId) -> InventoryResult<Product> {
        self.get_json(&format!("products/{}", id), "Product", id)
            .await
    }

    async fn get_stock(&self, id: ProductId) -> InventoryResult<Stock> {
        self.get_json(&format!("stock/{}", id), "Stock", id).await
    }

    async fn list_products(&self) -> InventoryResult<Vec<Product>> {
        self.get_json("products", "Products", 0).await
    }
}

// =============================================================================
// Static Catalog
// =============================================================================

/// The JSON document the inventory API is served from.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
    #[serde(default)]
    stock: Vec<Stock>,
}

/// In-memory inventory.
///
/// Stock can be changed between operations and the whole inventory can be
/// taken offline, which makes it the inventory of choice for tests and for
/// running the CLI without the API.
#[derive(Debug, Default)]
pub struct StaticInventory {
    products: Mutex<Vec<Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
    offline: AtomicBool,
    lookups: AtomicUsize,
}

impl StaticInventory {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog document (`{"products": [...], "stock": [...]}`).
    pub fn from_catalog_json(json: &str) -> InventoryResult<Self> {
        let doc: CatalogDocument =
            serde_json::from_str(json).map_err(|e| InventoryError::Malformed(e.to_string()))?;

        let inventory = StaticInventory::new();
        for product in doc.products {
            inventory.insert_product(product);
        }
        for stock in doc.stock {
            inventory.set_stock(stock.id, stock.amount);
        }

        Ok(inventory)
    }

    /// Adds a product with a stock level.
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.set_stock(product.id, stock);
        self.insert_product(product);
        self
    }

    /// Adds or replaces a product.
    pub fn insert_product(&self, product: Product) {
        let mut products = self.products.lock().unwrap_or_else(|e| e.into_inner());
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
    }

    /// Sets the stock level for a product.
    pub fn set_stock(&self, id: ProductId, amount: i64) {
        self.stock
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, amount);
    }

    /// Simulates the inventory being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of lookups served so far (including failed ones).
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn begin_lookup(&self) -> InventoryResult<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(InventoryError::Unreachable(
                "inventory is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryClient for StaticInventory {
    async fn get_product(&self, id: ProductId) -> InventoryResult<Product> {
        self.begin_lookup()?;
        self.products
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(InventoryError::NotFound {
                resource: "Product",
                id,
            })
    }

    async fn get_stock(&self, id: ProductId) -> InventoryResult<Stock> {
        self.begin_lookup()?;
        self.stock
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .map(|&amount| Stock { id, amount })
            .ok_or(InventoryError::NotFound {
                resource: "Stock",
                id,
            })
    }

    async fn list_products(&self) -> InventoryResult<Vec<Product>> {
        self.begin_lookup()?;
        Ok(self
            .products
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const CATALOG: &str = r#"{
        "products": [
            {"id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://example.com/1.jpg"},
            {"id": 2, "title": "Tênis VR Caminhada Confortável Detalhes Couro Masculino", "price": 139.9, "image": "https://example.com/2.jpg"}
        ],
        "stock": [
            {"id": 1, "amount": 3},
            {"id": 2, "amount": 5}
        ]
    }"#;

    #[tokio::test]
    async fn test_catalog_lookups() {
        let inventory = StaticInventory::from_catalog_json(CATALOG).unwrap();

        let product = inventory.get_product(2).await.unwrap();
        assert_eq!(product.price, 139.9);
        assert_eq!(inventory.get_stock(1).await.unwrap().amount, 3);
        assert_eq!(inventory.list_products().await.unwrap().len(), 2);
        assert_eq!(inventory.lookups(), 3);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let inventory = StaticInventory::from_catalog_json(CATALOG).unwrap();

        assert!(matches!(
            inventory.get_product(99).await,
            Err(InventoryError::NotFound { id: 99, .. })
        ));
        assert!(matches!(
            inventory.get_stock(99).await,
            Err(InventoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_offline_inventory_is_unreachable() {
        let inventory = StaticInventory::from_catalog_json(CATALOG).unwrap();
        inventory.set_offline(true);

        assert!(matches!(
            inventory.get_stock(1).await,
            Err(InventoryError::Unreachable(_))
        ));

        inventory.set_offline(false);
        assert!(inventory.get_stock(1).await.is_ok());
    }

    #[test]
    fn test_malformed_catalog() {
        assert!(matches!(
            StaticInventory::from_catalog_json("{\"stock\": []}"),
            Err(InventoryError::Malformed(_))
        ));
    }

    #[test]
    fn test_http_client_normalizes_base_url() {
        let config = InventoryConfig {
            base_url: "http://localhost:3333/".to_string(),
            timeout_secs: 5,
        };
        let client = HttpInventoryClient::new(&config).unwrap();

        assert_eq!(client.url("stock/1"), "http://localhost:3333/stock/1");
    }

    /// Answers every connection with the same response and returns the base URL.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 2048];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn http_client(base_url: String) -> HttpInventoryClient {
        HttpInventoryClient::new(&InventoryConfig {
            base_url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_http_reads_product_and_stock() {
        let client = http_client(
            serve(
                "200 OK",
                r#"{"id": 7, "title": "Tênis", "price": 99.9, "image": "i", "amount": 4}"#,
            )
            .await,
        );

        let product = client.get_product(7).await.unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.title, "Tênis");
        assert_eq!(client.get_stock(7).await.unwrap().amount, 4);
    }

    #[tokio::test]
    async fn test_http_404_is_not_found() {
        let client = http_client(serve("404 Not Found", "{}").await);

        assert!(matches!(
            client.get_stock(7).await,
            Err(InventoryError::NotFound {
                resource: "Stock",
                id: 7
            })
        ));
        assert!(matches!(
            client.get_product(7).await,
            Err(InventoryError::NotFound {
                resource: "Product",
                id: 7
            })
        ));
    }

    #[tokio::test]
    async fn test_http_server_error_is_status() {
        let client = http_client(serve("500 Internal Server Error", "{}").await);

        assert!(matches!(
            client.get_stock(7).await,
            Err(InventoryError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_http_bad_body_is_malformed() {
        let client = http_client(serve("200 OK", r#"{"id": 7, "amount": "lots"}"#).await);

        assert!(matches!(
            client.get_stock(7).await,
            Err(InventoryError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_http_closed_port_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = http_client(format!("http://{}", addr));

        assert!(matches!(
            client.get_stock(7).await,
            Err(InventoryError::Unreachable(_))
        ));
    }
}

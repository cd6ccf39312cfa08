//! # rocket-db: Database Layer for RocketShoes Cart
//!
//! Durable local storage for the cart. SQLite through sqlx, with a single
//! key-value table that holds serialized snapshots.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Persistence Flow                            │
//! │                                                                         │
//! │  CartState (apps/cart) ──► SqliteStore ──► KeyValueRepository          │
//! │                                                 │                       │
//! │  ┌──────────────────────────────────────────────▼──────────────────┐   │
//! │  │                     rocket-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ (kv.rs)       │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rocketshoes.db (local file, WAL mode)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rocket_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/rocketshoes.db")).await?;
//! db.key_values().put("@RocketShoes:cart", "[]").await?;
//! let snapshot = db.key_values().get("@RocketShoes:cart").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KeyValueRepository;

//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! CartState
//!      │
//!      │  db.key_values().put("@RocketShoes:cart", snapshot)
//!      ▼
//! KeyValueRepository
//! ├── get(&self, key)
//! ├── put(&self, key, value)
//! └── delete(&self, key)
//!      │
//!      │  SQL Query
//!      ▼
//! SQLite Database
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KeyValueRepository`] - Namespaced snapshot storage

pub mod kv;

//! # Key-Value Repository
//!
//! Stores opaque text values under string keys. The cart writes its whole
//! snapshot under one namespaced key after every successful mutation.
//!
//! ## Write Semantics
//! ```text
//! put("@RocketShoes:cart", "[...]")
//!      │
//!      ▼
//! INSERT ... ON CONFLICT(key) DO UPDATE
//!      │
//!      ▼
//! One row per key, always the latest full value
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the `key_value_store` table.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads the value stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Some(value))` - Key exists
    /// * `Ok(None)` - Key was never written
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        debug!(key = %key, "Reading key");

        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM key_value_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO key_value_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

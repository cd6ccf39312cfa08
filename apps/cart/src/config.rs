//! # Cart Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ROCKET_API_URL=http://localhost:3333                               │
//! │     ROCKET_API_TIMEOUT_SECS=10                                         │
//! │     ROCKET_DB_PATH=/tmp/rocketshoes.db                                 │
//! │     ROCKET_CART_KEY=@RocketShoes:cart                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/rocketshoes/cart.toml (Linux)                            │
//! │     ~/Library/Application Support/com.rocketshoes.cart/cart.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [inventory]
//! base_url = "http://localhost:3333"
//! timeout_secs = 10
//!
//! [storage]
//! database_path = "/var/lib/rocketshoes/rocketshoes.db"
//! cart_key = "@RocketShoes:cart"
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use rocket_core::CART_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Inventory API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Base URL of the inventory API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Lookups exceeding it fail as unreachable.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Key the cart snapshot is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            database_path: None,
            cart_key: default_cart_key(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`cart.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.inventory.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "Inventory URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.inventory.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storage.cart_key.trim().is_empty() {
            return Err(ConfigError::Invalid("cart_key must not be empty".into()));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the environment, in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ROCKET_API_URL") {
            debug!(url = %url, "Overriding inventory URL from environment");
            self.inventory.base_url = url;
        }

        if let Some(timeout) = lookup("ROCKET_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.inventory.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid ROCKET_API_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("ROCKET_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("ROCKET_CART_KEY") {
            self.storage.cart_key = key;
        }
    }

    /// Resolves the database file, creating its directory if needed.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or_else(|| {
            ConfigError::Invalid("Could not determine app data directory".into())
        })?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("rocketshoes.db"))
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "rocketshoes", "cart")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.inventory.base_url, "http://localhost:3333");
        assert_eq!(config.storage.cart_key, "@RocketShoes:cart");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [inventory]
            base_url = "https://api.rocketshoes.dev"
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.base_url, "https://api.rocketshoes.dev");
        assert_eq!(config.inventory.timeout_secs, 10);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.inventory.base_url = "ftp://inventory".to_string();
        assert!(config.validate().is_err());

        config.inventory.base_url = "http://localhost:3333".to_string();
        config.inventory.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.inventory.timeout_secs = 5;
        config.storage.cart_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ROCKET_API_URL", "http://10.0.0.2:3333"),
            ("ROCKET_API_TIMEOUT_SECS", "not-a-number"),
            ("ROCKET_DB_PATH", "/tmp/cart.db"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.inventory.base_url, "http://10.0.0.2:3333");
        assert_eq!(config.inventory.timeout_secs, 10);
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/cart.db")
        );
        assert_eq!(config.storage.cart_key, "@RocketShoes:cart");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(
            &path,
            "[storage]\ncart_key = \"@RocketShoes:test\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(path)).unwrap();
        assert_eq!(config.storage.cart_key, "@RocketShoes:test");
    }
}

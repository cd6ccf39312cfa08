//! # RocketShoes Cart Library
//!
//! Cart service and its collaborators, plus the command-line front end.
//!
//! ## Module Organization
//! ```text
//! rocket_cart/
//! ├── lib.rs          ◄─── You are here (CLI definition & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── cart.rs     ◄─── Cart service (validate → mutate → persist)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Product listing
//! │   └── cart.rs     ◄─── Cart manipulation commands
//! ├── inventory.rs    ◄─── Inventory client (HTTP, static catalog)
//! ├── store.rs        ◄─── Persistent store (SQLite, memory)
//! ├── notifier.rs     ◄─── User-visible failure messages
//! ├── config.rs       ◄─── TOML + env configuration
//! └── error.rs        ◄─── Cart and API error types
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod inventory;
pub mod notifier;
pub mod state;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rocket_core::ProductId;
use rocket_db::{Database, DbConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::ApiError;
use inventory::{HttpInventoryClient, InventoryClient, StaticInventory};
use notifier::NoOpNotifier;
use state::CartState;
use store::SqliteStore;

/// RocketShoes shopping cart.
#[derive(Debug, Parser)]
#[command(name = "rocket-cart", version, about)]
pub struct Cli {
    /// Config file (defaults to cart.toml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve products and stock from a local catalog JSON file instead of the API
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Cart operations exposed on the command line.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products with the amount already in the cart
    Products,
    /// Show the cart
    Cart,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the amount of a product in the cart
    Update { product_id: ProductId, amount: i64 },
    /// Empty the cart
    Clear,
}

/// Runs one command.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Startup                                   │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → cart.toml → ROCKET_* environment                       │
/// │                                                                         │
/// │  2. Build Inventory Client ───────────────────────────────────────────► │
/// │     • --catalog file: static catalog                                    │
/// │     • otherwise: HTTP client with the configured timeout                │
/// │                                                                         │
/// │  3. Open Database ────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Restore Cart ─────────────────────────────────────────────────────► │
/// │     • Read the snapshot, fall back to an empty cart                     │
/// │                                                                         │
/// │  5. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • Print the JSON response on stdout                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    let config = AppConfig::load(cli.config)?;

    let inventory: Arc<dyn InventoryClient> = match &cli.catalog {
        Some(path) => {
            info!(?path, "Using local catalog");
            let json = std::fs::read_to_string(path).map_err(|e| {
                ApiError::internal(format!("Could not read catalog {}: {}", path.display(), e))
            })?;
            Arc::new(StaticInventory::from_catalog_json(&json)?)
        }
        None => Arc::new(HttpInventoryClient::new(&config.inventory)?),
    };

    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");
    let db = Database::new(DbConfig::new(db_path))
        .await
        .map_err(store::StoreError::from)?;

    let cart = CartState::open_with_key(
        inventory.clone(),
        Arc::new(SqliteStore::new(db.clone())),
        Arc::new(NoOpNotifier),
        config.storage.cart_key.clone(),
    )
    .await;

    let result = dispatch(cli.command, inventory.as_ref(), &cart).await;
    db.close().await;
    result
}

async fn dispatch(
    command: Command,
    inventory: &dyn InventoryClient,
    cart: &CartState,
) -> Result<(), ApiError> {
    match command {
        Command::Products => print_json(&commands::product::list_products(inventory, cart).await?),
        Command::Cart => print_json(&commands::cart::get_cart(cart).await),
        Command::Add { product_id } => {
            print_json(&commands::cart::add_to_cart(cart, product_id).await?)
        }
        Command::Remove { product_id } => {
            print_json(&commands::cart::remove_from_cart(cart, product_id).await?)
        }
        Command::Update { product_id, amount } => {
            print_json(&commands::cart::update_cart_item(cart, product_id, amount).await?)
        }
        Command::Clear => print_json(&commands::cart::clear_cart(cart).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Could not encode response: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Renders a failed command for stderr.
///
/// This is the only place a failure reaches the user on the command line;
/// the cart's notifier is silent there.
pub fn error_report(err: &ApiError) -> String {
    serde_json::to_string(err).unwrap_or_else(|_| err.to_string())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rocket=trace` - Show trace for rocket crates only
/// - Default: INFO, DEBUG for rocket crates
///
/// Logs go to stderr so stdout carries only command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rocket=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update() {
        let cli = Cli::try_parse_from(["rocket-cart", "update", "3", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Update {
                product_id: 3,
                amount: 2
            }
        ));
    }

    #[test]
    fn test_parse_global_catalog_flag() {
        let cli =
            Cli::try_parse_from(["rocket-cart", "add", "1", "--catalog", "server.json"]).unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("server.json")));
        assert!(matches!(cli.command, Command::Add { product_id: 1 }));
    }

    #[tokio::test]
    async fn test_run_against_local_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("server.json");
        std::fs::write(
            &catalog,
            r#"{"products":[{"id":1,"title":"Tênis","price":99.9,"image":"i"}],"stock":[{"id":1,"amount":1}]}"#,
        )
        .unwrap();
        let config = dir.path().join("cart.toml");
        std::fs::write(
            &config,
            format!(
                "[storage]\ndatabase_path = {:?}\n",
                dir.path().join("cart.db").display().to_string()
            ),
        )
        .unwrap();

        let args = |cmd: &[&str]| {
            let mut argv = vec![
                "rocket-cart".to_string(),
                "--config".to_string(),
                config.display().to_string(),
                "--catalog".to_string(),
                catalog.display().to_string(),
            ];
            argv.extend(cmd.iter().map(|s| s.to_string()));
            Cli::try_parse_from(argv).unwrap()
        };

        run(args(&["add", "1"])).await.unwrap();
        let err = run(args(&["add", "1"])).await.unwrap_err();
        assert_eq!(err.code, error::ErrorCode::InsufficientStock);
        run(args(&["remove", "1"])).await.unwrap();
    }

    #[test]
    fn test_error_report_is_one_json_line() {
        let err = ApiError::from(error::CartError::ProductNotFound(9));

        let report = error_report(&err);

        assert!(!report.contains('\n'));
        assert_eq!(report.matches(err.message.as_str()).count(), 1);
        let json: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
    }
}

//! # RocketShoes Cart Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        rocket-cart                                      │
//! │                                                                         │
//! │  main.rs ────► Parses arguments, sets up logging                        │
//! │                                                                         │
//! │  lib.rs ─────► Loads config, wires collaborators, dispatches            │
//! │                                                                         │
//! │  stdout ─────► JSON response                                            │
//! │  stderr ─────► logs, ApiError JSON on failure                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;
use rocket_cart::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The actual setup is in lib.rs for better testability
    rocket_cart::init_tracing();

    match rocket_cart::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", rocket_cart::error_report(&err));
            ExitCode::FAILURE
        }
    }
}

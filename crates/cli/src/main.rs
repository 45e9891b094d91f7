//! RocketShoes CLI - drive the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cli show
//!
//! # Add one unit of product 3
//! rs-cli add 3
//!
//! # Set product 3 to 2 units
//! rs-cli update 3 2
//!
//! # Drop product 3
//! rs-cli remove 3
//! ```
//!
//! The CLI reads the same environment as the storefront (`CATALOG_API_URL`,
//! `CART_STORAGE_PATH`, `CART_STORAGE_KEY`, ...) and edits the same file.
//! A rejected operation prints its notice and exits with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity (must be at least 1)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rocketshoes_cli=info,rocketshoes_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Show => commands::cart::show().await,
        Commands::Add { product_id } => commands::cart::add(product_id).await,
        Commands::Remove { product_id } => commands::cart::remove(product_id).await,
        Commands::Update { product_id, amount } => {
            commands::cart::update(product_id, amount).await
        }
    }
}

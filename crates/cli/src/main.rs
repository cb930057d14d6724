//! RocketShoes CLI - Cart management from the terminal.
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
//! # Set product 3 to five units
//! rs-cli update 3 5
//!
//! # Remove product 3, then empty the cart
//! rs-cli remove 3
//! rs-cli clear
//! ```
//!
//! Configuration comes from the same environment variables as the server
//! (`CATALOG_API_URL`, `CART_STORAGE_DIR`, ...). The command exits with status
//! 1 if the cart operation failed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Directory holding the persisted cart (overrides `CART_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Catalog service base URL (overrides `CATALOG_API_URL`)
    #[arg(long, global = true)]
    catalog_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Catalog product ID
        product_id: ProductId,

        /// New amount; zero or less is ignored
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rocketshoes_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match commands::run(cli).await {
        Ok(commands::Outcome::Applied) => {}
        Ok(commands::Outcome::Rejected) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_with_negative_amount() {
        let cli = Cli::try_parse_from(["rs-cli", "update", "3", "-2"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Update { amount: -2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["rs-cli", "add", "sneaker"]).is_err());
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "rs-cli",
            "show",
            "--storage-dir",
            "/tmp/cart",
            "--catalog-url",
            "http://localhost:4000",
        ]);
        let Ok(cli) = cli else {
            panic!("expected overrides to parse");
        };
        assert_eq!(cli.storage_dir, Some(PathBuf::from("/tmp/cart")));
        assert_eq!(
            cli.catalog_url.map(String::from).as_deref(),
            Some("http://localhost:4000/")
        );
    }
}

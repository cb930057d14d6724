//! Command dispatch.

pub mod cart;

use std::io::Write;
use std::path::PathBuf;

use rocketshoes_storefront::catalog::CatalogError;
use rocketshoes_storefront::config::{ConfigError, StorefrontConfig};
use rocketshoes_storefront::storage::StorageError;
use thiserror::Error;
use url::Url;

use crate::{Cli, Commands};

/// Errors that stop a command before or after the cart operation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog client could not be built.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart storage could not be cleared.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a cart command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran without raising a toast.
    Applied,
    /// The cart store rejected the operation; the cart is unchanged.
    Rejected,
}

/// Run a parsed command against the persisted cart.
pub async fn run(cli: Cli) -> Result<Outcome, CommandError> {
    let config = with_overrides(StorefrontConfig::from_env()?, cli.storage_dir, cli.catalog_url)?;
    let (mut store, toasts) = cart::open_store(&config)?;

    let current = match cli.command {
        Commands::Show => store.cart(),
        Commands::Add { product_id } => store.add_product(product_id).await,
        Commands::Remove { product_id } => store.remove_product(product_id),
        Commands::Update { product_id, amount } => {
            store.update_product_amount(product_id, amount).await
        }
        Commands::Clear => store.clear()?,
    };

    std::io::stdout().lock().write_all(cart::render(current).as_bytes())?;

    let raised = toasts.drain();
    let mut stderr = std::io::stderr().lock();
    for toast in &raised {
        writeln!(stderr, "error: {} (product {})", toast.message, toast.product_id)?;
    }

    Ok(if raised.is_empty() {
        Outcome::Applied
    } else {
        Outcome::Rejected
    })
}

/// Apply command-line overrides on top of the environment configuration.
fn with_overrides(
    mut config: StorefrontConfig,
    storage_dir: Option<PathBuf>,
    catalog_url: Option<Url>,
) -> Result<StorefrontConfig, ConfigError> {
    if let Some(dir) = storage_dir {
        config.storage_dir = dir;
    }
    if let Some(url) = catalog_url {
        config.catalog.set_base_url(url)?;
    }
    Ok(config)
}

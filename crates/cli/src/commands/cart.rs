//! Cart store wiring and terminal rendering.

use rocketshoes_core::{Cart, format_price};
use rocketshoes_storefront::cart::CartStore;
use rocketshoes_storefront::catalog::{CatalogClient, CatalogError};
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::notify::ToastQueue;
use rocketshoes_storefront::storage::{CartPersistence, FileStore};

/// Cart store as wired for the CLI.
pub type CliCartStore = CartStore<CatalogClient, FileStore, ToastQueue>;

/// Open the persisted cart described by `config`.
///
/// Returns the store and the queue it reports failures to.
pub fn open_store(config: &StorefrontConfig) -> Result<(CliCartStore, ToastQueue), CatalogError> {
    let catalog = CatalogClient::new(&config.catalog)?;
    let persistence = CartPersistence::new(FileStore::new(&config.storage_dir));
    let toasts = ToastQueue::new();

    let store = CartStore::open(catalog, persistence, toasts.clone());
    Ok((store, toasts))
}

/// Render the cart as a plain-text listing.
pub fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out: String = cart
        .iter()
        .map(|item| {
            format!(
                "#{:<4} {:<50} {:>3} x {:>10} = {:>10}\n",
                item.product.id,
                item.product.title,
                item.amount,
                format_price(item.product.price),
                format_price(item.line_total()),
            )
        })
        .collect();
    out.push_str(&format!(
        "Items: {}  Subtotal: {}\n",
        cart.total_quantity(),
        format_price(cart.subtotal())
    ));
    out
}

//! Cart commands.
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Base URL of the stock/product service (required by
//!   every command except `show`)
//! - `CATALOG_API_TOKEN` - Bearer token for the service (optional)
//! - `CART_STORAGE_PATH` - JSON key-value file holding the cart
//! - `CART_STORAGE_KEY` - Key of the cart inside that file

use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId, format_price};
use rocketshoes_storefront::cart::{
    CartError, CartOperation, CartStore, Notice, UpdateProductAmount, read_persisted,
};
use rocketshoes_storefront::catalog::{Catalog, HttpCatalog};
use rocketshoes_storefront::config::{CartStorageConfig, CatalogConfig};
use rocketshoes_storefront::storage::FileStore;

use super::CliError;

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Build the store from the environment and load the persisted cart.
async fn open() -> Result<CartStore, CliError> {
    dotenvy::dotenv().ok();

    let catalog_config = CatalogConfig::from_lookup(env_lookup)?;
    let storage_config = CartStorageConfig::from_lookup(env_lookup);

    tracing::debug!(
        catalog = %catalog_config.base_url,
        storage = %storage_config.path.display(),
        "Opening cart"
    );

    let catalog: Arc<dyn Catalog> = Arc::new(HttpCatalog::new(&catalog_config)?);
    let storage = Arc::new(FileStore::new(storage_config.path));

    CartStore::load(catalog, storage, storage_config.key)
        .await
        .map_err(CliError::Load)
}

/// Read the persisted cart without touching the catalog.
async fn load_cart(config: &CartStorageConfig) -> Result<Cart, CliError> {
    tracing::debug!(storage = %config.path.display(), "Reading cart");
    let storage = FileStore::new(&config.path);
    read_persisted(&storage, &config.key)
        .await
        .map_err(CliError::Load)
}

/// Print the cart.
pub async fn show() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cart = load_cart(&CartStorageConfig::from_lookup(env_lookup)).await?;
    print_cart(&cart);
    Ok(())
}

/// Add one unit of a product.
pub async fn add(product_id: ProductId) -> Result<(), CliError> {
    let store = open().await?;
    let result = store.add_product(product_id).await;
    finish(CartOperation::Add, result)
}

/// Remove a product's line.
pub async fn remove(product_id: ProductId) -> Result<(), CliError> {
    let store = open().await?;
    let result = store.remove_product(product_id).await;
    finish(CartOperation::Remove, result)
}

/// Set a line's quantity.
pub async fn update(product_id: ProductId, amount: i64) -> Result<(), CliError> {
    let store = open().await?;
    let result = store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    finish(CartOperation::UpdateAmount, result)
}

fn finish(operation: CartOperation, result: Result<Arc<Cart>, CartError>) -> Result<(), CliError> {
    let notice = Notice::for_result(operation, &result);
    match result {
        Ok(cart) => {
            tracing::info!("{}", notice.message);
            print_cart(&cart);
            Ok(())
        }
        Err(source) => Err(CliError::Rejected { notice, source }),
    }
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    for line in render(cart) {
        println!("{line}");
    }
}

/// Cart as printable lines, one per item plus a total.
fn render(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Carrinho vazio".to_string()];
    }

    let mut lines: Vec<String> = cart
        .iter()
        .map(|item| {
            format!(
                "{:>5}  {:<40} {:>3} x {:>12} = {:>12}",
                item.id(),
                item.product.title,
                item.amount,
                item.product.price.map_or_else(|| "-".to_string(), format_price),
                item.subtotal().map_or_else(|| "-".to_string(), format_price),
            )
        })
        .collect();
    lines.push(format!("TOTAL  {}", format_price(cart.total())));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{CartItem, Product};
    use rocketshoes_storefront::storage::KeyValueStore;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Cart::new()), vec!["Carrinho vazio"]);
    }

    #[test]
    fn test_render_lines_and_total() {
        let mut item = CartItem::new(Product::new(
            ProductId::new(2),
            "Tênis VR Caminhada Confortável",
            Decimal::new(13_990, 2),
            "",
        ));
        item.amount = 2;
        let cart = Cart::from_items([item]);

        let lines = render(&cart);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Tênis VR Caminhada Confortável"));
        assert!(lines[0].contains("R$ 139,90"));
        assert!(lines[0].contains("R$ 279,80"));
        assert_eq!(lines[1], "TOTAL  R$ 279,80");
    }

    #[test]
    fn test_render_line_without_price() {
        let item: CartItem = serde_json::from_str(r#"{"id":4,"amount":2}"#).unwrap();
        let cart = Cart::from_items([item]);

        let lines = render(&cart);
        assert!(lines[0].contains(" - "));
        assert_eq!(lines[1], "TOTAL  R$ 0,00");
    }

    #[tokio::test]
    async fn test_load_cart_reads_slot_without_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let config = CartStorageConfig {
            path: dir.path().join("storage.json"),
            key: "@RocketShoes:cart".to_string(),
        };
        FileStore::new(&config.path)
            .set(&config.key, r#"[{"id":2,"title":"Tênis","price":"139.90","amount":3}]"#.to_string())
            .await
            .unwrap();

        let cart = load_cart(&config).await.unwrap();
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total(), Decimal::new(41_970, 2));
    }

    #[tokio::test]
    async fn test_load_cart_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = CartStorageConfig {
            path: dir.path().join("absent.json"),
            key: "@RocketShoes:cart".to_string(),
        };
        assert!(load_cart(&config).await.unwrap().is_empty());
    }
}

//! `HttpCatalog` against a live HTTP stock service.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::StockService;
use rocketshoes_storefront::catalog::{Catalog, CatalogError, HttpCatalog};
use rust_decimal::Decimal;

async fn setup() -> (StockService, HttpCatalog) {
    let service = StockService::start().await.unwrap();
    service.add_product(1, "Tênis de Caminhada Leve Confortável", 179.9, 3);
    service.add_product(2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 0);
    let catalog = HttpCatalog::new(&service.catalog_config(Duration::from_secs(2))).unwrap();
    (service, catalog)
}

#[tokio::test]
async fn test_fetches_stock() {
    let (_service, catalog) = setup().await;

    assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, 3);
    assert_eq!(catalog.stock(ProductId::new(2)).await.unwrap().amount, 0);
}

#[tokio::test]
async fn test_fetches_product_with_numeric_price() {
    let (_service, catalog) = setup().await;

    let product = catalog.product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.id, ProductId::new(1));
    assert_eq!(product.title, "Tênis de Caminhada Leve Confortável");
    assert_eq!(product.price, Some(Decimal::new(1799, 1)));
    assert!(product.image.ends_with("tenis1.jpg"));
}

#[tokio::test]
async fn test_negative_stock_is_passed_through() {
    let (service, catalog) = setup().await;
    service.set_stock(1, -1);
    assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, -1);
}

#[tokio::test]
async fn test_record_without_title_or_price() {
    let (service, catalog) = setup().await;
    service.add_record(5, serde_json::json!({"id": 5, "price": null, "image": "x.jpg"}), 1);

    let product = catalog.product(ProductId::new(5)).await.unwrap();
    assert_eq!(product.title, "");
    assert_eq!(product.price, None);
    assert_eq!(product.image, "x.jpg");
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (_service, catalog) = setup().await;

    let err = catalog.stock(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)), "got {err:?}");

    let err = catalog.product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (service, catalog) = setup().await;
    service.set_malformed(1);

    let err = catalog.stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let (service, catalog) = setup().await;
    service.set_failing(true);

    let err = catalog.stock(ProductId::new(1)).await.unwrap_err();
    match err {
        CatalogError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let service = StockService::start().await.unwrap();
    service.add_product(1, "Tênis", 100.0, 1);
    service.set_delay(Duration::from_millis(500));
    let catalog = HttpCatalog::new(&service.catalog_config(Duration::from_millis(100))).unwrap();

    let err = catalog.stock(ProductId::new(1)).await.unwrap_err();
    match err {
        CatalogError::Http(e) => assert!(e.is_timeout(), "got {e:?}"),
        other => panic!("expected HTTP timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_products_are_cached_stock_is_not() {
    let (service, catalog) = setup().await;

    for _ in 0..3 {
        catalog.product(ProductId::new(1)).await.unwrap();
        catalog.stock(ProductId::new(1)).await.unwrap();
    }

    assert_eq!(service.product_requests(), 1);
    assert_eq!(service.stock_requests(), 3);
}

#[tokio::test]
async fn test_stock_changes_are_seen_immediately() {
    let (service, catalog) = setup().await;

    assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, 3);
    service.set_stock(1, 7);
    assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, 7);
}

#[tokio::test]
async fn test_ping() {
    let (service, catalog) = setup().await;
    // Resource failures do not affect the root
    service.set_failing(true);
    catalog.ping().await.unwrap();
}

//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed: [`StockService`] serves the stock and
//! product endpoints from an in-process axum server on an ephemeral port,
//! and the real `HttpCatalog` talks to it over HTTP.
//!
//! # Test Categories
//!
//! - `catalog_client` - `HttpCatalog` against live HTTP responses
//! - `cart_flow` - `CartStore` end to end with a file-backed slot
//! - `storefront_api` - the JSON cart server over the same stack

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rocketshoes_storefront::config::CatalogConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// In-process stand-in for the stock/product REST service.
///
/// Cloning shares the same data, so tests can change stock while a store
/// is using the service.
#[derive(Clone)]
pub struct StockService {
    addr: SocketAddr,
    inner: Arc<ServiceInner>,
}

#[derive(Default)]
struct ServiceInner {
    data: Mutex<ServiceData>,
    stock_requests: AtomicUsize,
    product_requests: AtomicUsize,
}

#[derive(Default)]
struct ServiceData {
    stock: HashMap<i32, i64>,
    products: HashMap<i32, Value>,
    malformed: HashSet<i32>,
    failing: bool,
    delay: Option<Duration>,
}

impl StockService {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let inner = Arc::new(ServiceInner::default());

        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&inner));

        tokio::spawn(async move {
            // Runs until the test runtime shuts down
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, inner })
    }

    /// Base URL of the service.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Catalog configuration pointing at this service.
    ///
    /// # Panics
    ///
    /// Never in practice: the URL is built from a bound socket address.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn catalog_config(&self, timeout: Duration) -> CatalogConfig {
        CatalogConfig {
            base_url: self.url().parse().expect("socket address is a valid URL"),
            api_token: None,
            timeout,
        }
    }

    /// Register a product with its stock level.
    pub fn add_product(&self, id: i32, title: &str, price: f64, amount: i64) {
        self.add_record(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
            }),
            amount,
        );
    }

    /// Register a raw product record, served as-is, with its stock level.
    pub fn add_record(&self, id: i32, record: Value, amount: i64) {
        let mut data = self.data();
        data.products.insert(id, record);
        data.stock.insert(id, amount);
    }

    /// Change the stock level of a product.
    pub fn set_stock(&self, id: i32, amount: i64) {
        self.data().stock.insert(id, amount);
    }

    /// Serve a record that is not valid JSON for this id.
    pub fn set_malformed(&self, id: i32) {
        self.data().malformed.insert(id);
    }

    /// Answer every resource request with a 500.
    pub fn set_failing(&self, failing: bool) {
        self.data().failing = failing;
    }

    /// Delay every resource response.
    pub fn set_delay(&self, delay: Duration) {
        self.data().delay = Some(delay);
    }

    /// Number of `/stock/{id}` requests served.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.inner.stock_requests.load(Ordering::SeqCst)
    }

    /// Number of `/products/{id}` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.inner.product_requests.load(Ordering::SeqCst)
    }

    fn data(&self) -> MutexGuard<'_, ServiceData> {
        self.inner.data()
    }
}

impl ServiceInner {
    fn data(&self) -> MutexGuard<'_, ServiceData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shared handling for both resources: delay, failure and malformed body.
    async fn respond(&self, id: i32, record: impl FnOnce(&ServiceData) -> Option<Value>) -> Response {
        let delay = self.data().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let data = self.data();
        if data.failing {
            return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
        }
        if data.malformed.contains(&id) {
            return (StatusCode::OK, "<html>not json</html>").into_response();
        }
        match record(&*data) {
            Some(value) => Json(value).into_response(),
            None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
        }
    }
}

async fn stock(State(inner): State<Arc<ServiceInner>>, Path(id): Path<i32>) -> Response {
    inner.stock_requests.fetch_add(1, Ordering::SeqCst);
    inner
        .respond(id, |data| {
            data.stock
                .get(&id)
                .map(|amount| json!({ "id": id, "amount": amount }))
        })
        .await
}

async fn product(State(inner): State<Arc<ServiceInner>>, Path(id): Path<i32>) -> Response {
    inner.product_requests.fetch_add(1, Ordering::SeqCst);
    inner
        .respond(id, |data| data.products.get(&id).cloned())
        .await
}

//! The JSON cart server over HTTP, backed by the in-process stock service.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use rocketshoes_integration_tests::StockService;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::routes;
use rocketshoes_storefront::state::AppState;
use serde_json::{Value, json};
use tempfile::TempDir;

struct TestContext {
    client: Client,
    base_url: String,
    service: StockService,
    _dir: TempDir,
}

impl TestContext {
    async fn new() -> Self {
        let service = StockService::start().await.unwrap();
        service.add_product(1, "Tênis de Caminhada Leve Confortável", 179.9, 2);
        service.add_product(2, "Tênis VR Caminhada Confortável", 139.9, 5);

        let dir = TempDir::new().unwrap();
        let storage_path = dir.path().join("storage.json").display().to_string();
        let catalog_url = service.url();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "CATALOG_API_URL" => Some(catalog_url.clone()),
            "CART_STORAGE_PATH" => Some(storage_path.clone()),
            _ => None,
        })
        .unwrap();

        let state = AppState::from_config(config).await.unwrap();
        let app = routes::routes().with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            service,
            _dir: dir,
        }
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }
}

#[tokio::test]
async fn test_health_and_readiness() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, _) = ctx.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_shopping_session() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.post("/cart/add", json!({"product_id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notice"]["message"], "Produto adicionado.");

    ctx.post("/cart/add", json!({"product_id": 1})).await;
    let (status, body) = ctx.post("/cart/add", json!({"product_id": 1})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["notice"]["message"],
        "Quantidade solicitada fora de estoque"
    );
    assert_eq!(body["cart"]["items"][0]["amount"], 2);

    let (status, body) = ctx
        .post("/cart/update", json!({"product_id": 1, "amount": 1}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notice"]["message"], "Produto atualizado.");
    assert_eq!(body["cart"]["total_formatted"], "R$ 179,90");

    let (status, body) = ctx.post("/cart/remove", json!({"product_id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notice"]["message"], "Produto removido.");
    assert_eq!(body["cart"]["items"], json!([]));

    let (_, body) = ctx.get("/cart/count").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let ctx = TestContext::new().await;
    ctx.service.set_failing(true);

    let (status, body) = ctx.post("/cart/add", json!({"product_id": 2})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["notice"]["message"], "Erro na adição do produto");
    assert_eq!(body["cart"]["item_count"], 0);
}

#[tokio::test]
async fn test_unreadable_body_gets_cart_envelope() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", json!({"product_id": 2})).await;

    let (status, body) = ctx
        .post("/cart/update", json!({"product_id": 2, "amount": "abc"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["level"], "error");
    assert_eq!(
        body["notice"]["message"],
        "Erro na alteração de quantidade do produto"
    );
    assert_eq!(body["cart"]["items"][0]["amount"], 1);
}

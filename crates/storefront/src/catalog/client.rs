//! REST client for the stock/product service.
//!
//! Uses `reqwest` with a per-request timeout. Products are cached using
//! `moka` (5-minute TTL); stock never is.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

/// Longest response body excerpt kept in errors and logs.
const BODY_EXCERPT: usize = 200;

// =============================================================================
// HttpCatalog
// =============================================================================

/// Client for the stock/product REST service.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    products: Cache<ProductId, Product>,
}

impl HttpCatalog {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        // Resources are joined onto the base, which only works for a directory path
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(HttpCatalogInner {
                client,
                base_url,
                api_token: config.api_token.clone(),
                products,
            }),
        })
    }

    /// Base URL every resource is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn resource_url(&self, resource: &str, id: ProductId) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(&format!("{resource}/{id}"))?)
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self
            .inner
            .client
            .get(url)
            .header("Accept", "application/json");
        match &self.inner.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Fetch a resource and parse its JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: ProductId,
    ) -> Result<T, CatalogError> {
        let url = self.resource_url(resource, id)?;
        let response = self.request(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("{resource} {id}")));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %excerpt(&response_text),
                "Catalog service returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: excerpt(&response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %excerpt(&response_text),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.get_json("stock", id).await
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json("products", id).await?;
        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }

    /// Any answer short of a 5xx counts as reachable.
    #[instrument(skip(self))]
    async fn ping(&self) -> Result<(), CatalogError> {
        let response = self.request(self.inner.base_url.clone()).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        Ok(())
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT).collect()
}

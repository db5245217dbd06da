//! # Storefront API
//!
//! The two network calls the core depends on, behind the [`StoreApi`] seam.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  {base}/product/   ──►  { "total": 10, "items": [Product, ...] }  │
//! │                                                                         │
//! │  POST {base}/order/          { payment, address, email, phone,          │
//! │       body: OrderSnapshot     total, items: [id, ...] }                 │
//! │                         ──►  { "id": "...", "total": 2200 }             │
//! │                                                                         │
//! │  non-2xx                ──►  { "error": "reason" }  → ClientError::Api │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The returned futures are not `Send`: the session drives them on a
//! `LocalSet`, next to the single-threaded core.

use std::future::Future;

use larek_core::{OrderResult, OrderSnapshot, Product};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// StoreApi Trait
// =============================================================================

/// The catalog and order endpoints as seen by the session.
pub trait StoreApi {
    /// Fetches the full product list.
    fn fetch_products(&self) -> impl Future<Output = ClientResult<Vec<Product>>>;

    /// Submits an order and returns the id and charged total.
    fn submit_order(&self, snapshot: &OrderSnapshot)
        -> impl Future<Output = ClientResult<OrderResult>>;
}

/// Body of `GET /product/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    pub total: usize,
    pub items: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// `reqwest`-backed [`StoreApi`].
#[derive(Debug, Clone)]
pub struct HttpStoreApi {
    http: Client,
    base_url: Url,
    cdn_url: Url,
}

impl HttpStoreApi {
    /// Creates a client for the given API and CDN roots.
    ///
    /// Both URLs should end in `/`; [`ClientConfig::base_url`] guarantees it.
    pub fn new(base_url: Url, cdn_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
            cdn_url,
        }
    }

    /// Builds a client with the configured URLs and request timeout.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(config.base_url()?, config.cdn_url()?).with_http_client(http))
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn image_url(&self, product: &Product) -> ClientResult<Url> {
        image_url(&self.cdn_url, product)
    }
}

/// Resolves a product's image path against the CDN root.
///
/// Image paths arrive absolute (`/Shell.svg`); the leading slash is dropped
/// so the CDN root's own path is kept.
pub fn image_url(cdn_url: &Url, product: &Product) -> ClientResult<Url> {
    Ok(cdn_url.join(product.image.trim_start_matches('/'))?)
}

impl StoreApi for HttpStoreApi {
    async fn fetch_products(&self) -> ClientResult<Vec<Product>> {
        let url = self.base_url.join("product/")?;
        debug!(%url, "fetching catalog");

        let resp = self.http.get(url).send().await?;
        let page: ProductPage = parse_response(resp).await?;

        info!(count = page.items.len(), total = page.total, "catalog fetched");
        Ok(page.items)
    }

    async fn submit_order(&self, snapshot: &OrderSnapshot) -> ClientResult<OrderResult> {
        let url = self.base_url.join("order/")?;
        debug!(%url, total = %snapshot.total, items = snapshot.items.len(), "posting order");

        let resp = self.http.post(url).json(snapshot).send().await?;
        let result: OrderResult = parse_response(resp).await?;

        info!(order_id = %result.id, total = %result.total, "order accepted");
        Ok(result)
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> ClientResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(ClientError::Api { status, message });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

// =============================================================================
// Unit Tests
// =============================================================================

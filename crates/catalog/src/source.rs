//! Where the catalog comes from.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::product::Product;

/// Published location of the storefront's product list.
pub const DEFAULT_CATALOG_URL: &str =
    "https://s3.us-east-1.amazonaws.com/assets.spotandtango/products.json";

/// A one-shot provider of the full product list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and decode every product. No retries.
    async fn fetch(&self) -> Result<Vec<Product>, LoadError>;

    /// Short description for logs (URL, fixture name).
    fn describe(&self) -> String;
}

/// Catalog served as a static JSON document over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| LoadError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Catalog held in memory: fixtures, tests, offline demos.
#[derive(Debug, Clone)]
pub struct InMemoryCatalogSource {
    payload: Payload,
}

#[derive(Debug, Clone)]
enum Payload {
    Products(Vec<Product>),
    Json(String),
    Failure(LoadError),
}

impl InMemoryCatalogSource {
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            payload: Payload::Products(products),
        }
    }

    /// Decoded on every fetch, so malformed JSON surfaces as `LoadError::Decode`.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            payload: Payload::Json(json.into()),
        }
    }

    /// A source whose every fetch fails with `error`.
    pub fn failing(error: LoadError) -> Self {
        Self {
            payload: Payload::Failure(error),
        }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
        match &self.payload {
            Payload::Products(products) => Ok(products.clone()),
            Payload::Json(json) => {
                serde_json::from_str(json).map_err(|e| LoadError::Decode(e.to_string()))
            }
            Payload::Failure(error) => Err(error.clone()),
        }
    }

    fn describe(&self) -> String {
        match &self.payload {
            Payload::Products(products) => format!("in-memory ({} products)", products.len()),
            Payload::Json(_) => "in-memory JSON".to_string(),
            Payload::Failure(_) => "in-memory (failing)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PRODUCTS: &str = r#"[
        {"id":"lap-001","name":"ThinkPad T480","group":"Laptop","msrp":899.99,"price":349.0,"status":"Available"},
        {"id":"acc-001","name":"AirPods","group":"Accessory","msrp":129,"price":89,"status":"Unavailable"}
    ]"#;

    fn source_for(server: &mockito::ServerGuard) -> HttpCatalogSource {
        HttpCatalogSource::new(format!("{}/products.json", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn http_source_decodes_product_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TWO_PRODUCTS)
            .create_async()
            .await;

        let products = source_for(&server).fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id().as_str(), "acc-001");
    }

    #[tokio::test]
    async fn http_source_rejects_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products.json")
            .with_status(404)
            .create_async()
            .await;

        let err = source_for(&server).fetch().await.unwrap_err();
        assert_eq!(err, LoadError::Status(404));
    }

    #[tokio::test]
    async fn http_source_rejects_malformed_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products.json")
            .with_status(200)
            .with_body(r#"{"products": []}"#)
            .create_async()
            .await;

        let err = source_for(&server).fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let source = HttpCatalogSource::new("http://127.0.0.1:1/products.json", Duration::from_secs(2)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
    }

    #[tokio::test]
    async fn in_memory_json_is_decoded_on_fetch() {
        let products = InMemoryCatalogSource::from_json(TWO_PRODUCTS).fetch().await.unwrap();
        assert_eq!(products.len(), 2);

        let err = InMemoryCatalogSource::from_json("not json").fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}

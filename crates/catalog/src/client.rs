//! HTTP implementation of the catalog API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use storefront_core::ProductId;

use crate::api::{CatalogApi, ProductRecord, StockLevel};

/// Client for the catalog/stock HTTP API.
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize(base_url.into()),
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize(base_url.into()),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut req = self.http.get(&url);

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CatalogError::Api(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        resp.json().await.map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockLevel, CatalogError> {
        self.get_json(&format!("stock/{product_id}")).await
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductRecord, CatalogError> {
        self.get_json(&format!("products/{product_id}")).await
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("catalog API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

//! Catalog read API: trait and wire types.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use storefront_core::ProductId;

use crate::client::CatalogError;

/// Remote stock level for a product (`GET stock/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: ProductId,
    pub amount: u32,
}

/// Catalog payload for a product (`GET products/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
}

/// Read access to the remote catalog/stock service.
///
/// The cart store takes this trait so tests and alternative transports can
/// stand in for the HTTP client.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockLevel, CatalogError>;

    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductRecord, CatalogError>;
}

#[async_trait]
impl<S> CatalogApi for Arc<S>
where
    S: CatalogApi + ?Sized,
{
    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockLevel, CatalogError> {
        (**self).fetch_stock(product_id).await
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductRecord, CatalogError> {
        (**self).fetch_product(product_id).await
    }
}

//! Store-level error taxonomy.

use thiserror::Error;

use storefront_catalog::CatalogError;
use storefront_core::{DomainError, ProductId};

/// Failure categories surfaced by cart store operations.
///
/// Operations return these alongside the user-facing [`crate::Notice`] so
/// callers and tests can assert on the failure category while the UI keeps
/// showing fixed human-readable messages.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested quantity exceeds the remote stock level.
    #[error("requested quantity {requested} exceeds stock for product {product_id} ({available} available)")]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The targeted product has no line in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// A catalog request failed (network, API status, decode).
    #[error("catalog request failed: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the cart document failed; the in-memory cart was left
    /// unchanged.
    #[error("cart storage failed: {0}")]
    Storage(#[source] anyhow::Error),

    /// The cart rejected a mutation the store's own checks did not.
    #[error("cart state error: {0}")]
    State(#[from] DomainError),

    /// The store worker is gone (handle outlived the session).
    #[error("cart store is closed")]
    Closed,
}

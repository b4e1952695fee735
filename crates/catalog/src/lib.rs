//! `storefront-catalog`
//!
//! **Responsibility:** client for the remote catalog/stock API.
//!
//! This crate provides:
//! - The `CatalogApi` trait the cart store depends on
//! - Wire types for the two read endpoints (`stock/{id}`, `products/{id}`)
//! - An HTTP implementation backed by `reqwest`
//!
//! The catalog service is the authority for stock counts; this client never
//! caches them.

pub mod api;
pub mod client;

pub use api::{CatalogApi, ProductRecord, StockLevel};
pub use client::{CatalogError, HttpCatalogClient};

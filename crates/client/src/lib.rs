//! `storefront-client`
//!
//! **Responsibility:** the client-side cart state container.
//!
//! This crate provides:
//! - `CartStore`: add/remove/update operations with remote stock validation
//! - Write-through persistence of the cart document
//! - A serialized mutation queue (single worker task, issue order)
//! - The `Notifier` contract the storefront UI plugs its toasts into
//!
//! The store is a **thin shell** around the catalog API: stock counts are
//! always fetched fresh, never cached.

pub mod error;
pub mod notify;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use error::StoreError;
pub use notify::{Notice, Notifier, TracingNotifier};
pub use storage::{CartSnapshot, CartStorage, JsonFileStorage, MemoryStorage};
pub use store::{CartStore, StoreConfig};

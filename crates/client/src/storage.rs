//! Cart document persistence.
//!
//! The persisted form is a single JSON document: the item sequence wrapped
//! with a write stamp. Writes are synchronous and best-effort; there is no
//! retry and no transactional grouping with the preceding catalog call.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_cart::Cart;

/// Persisted form of the cart: the item sequence plus a write stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub saved_at: DateTime<Utc>,
    pub cart: Cart,
}

impl CartSnapshot {
    pub fn of(cart: &Cart) -> Self {
        Self {
            saved_at: Utc::now(),
            cart: cart.clone(),
        }
    }
}

/// Synchronous, best-effort persistence for the cart document.
pub trait CartStorage: Send + Sync {
    /// Load the last persisted snapshot; `None` when nothing was saved yet.
    fn load(&self) -> anyhow::Result<Option<CartSnapshot>>;

    /// Overwrite the persisted snapshot.
    fn save(&self, snapshot: &CartSnapshot) -> anyhow::Result<()>;
}

impl<S> CartStorage for Arc<S>
where
    S: CartStorage + ?Sized,
{
    fn load(&self) -> anyhow::Result<Option<CartSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> anyhow::Result<()> {
        (**self).save(snapshot)
    }
}

/// Single-document JSON storage on the local filesystem.
///
/// Defaults to `{os data dir}/storefront/cart.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage at the default OS location.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            path: default_cart_path()?,
        })
    }

    /// Storage at an explicit path (tests, portable installs).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> anyhow::Result<Option<CartSnapshot>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read cart document at {:?}", self.path)
                });
            }
        };

        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse cart document at {:?}", self.path))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &CartSnapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create cart directory at {:?}", parent))?;
        }

        let payload =
            serde_json::to_string(snapshot).context("failed to serialize cart snapshot")?;
        std::fs::write(&self.path, payload)
            .with_context(|| format!("failed to write cart document at {:?}", self.path))?;
        Ok(())
    }
}

/// Resolve the path to the cart document:
/// `{app_data_dir}/storefront/cart.json`.
fn default_cart_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("storefront");
    path.push("cart.json");
    Ok(path)
}

/// In-memory storage keeping the serialized document (tests).
///
/// Stores the raw serialized bytes so round-trip tests exercise real serde,
/// and corrupt content can be seeded directly.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    doc: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored document with raw content (e.g. corrupt bytes).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            doc: Mutex::new(Some(raw.into())),
        }
    }

    /// The raw stored document, if any.
    pub fn raw(&self) -> Option<String> {
        self.doc.lock().expect("cart document lock poisoned").clone()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> anyhow::Result<Option<CartSnapshot>> {
        let doc = self
            .doc
            .lock()
            .map_err(|_| anyhow::anyhow!("cart document lock poisoned"))?;
        match doc.as_deref() {
            None => Ok(None),
            Some(raw) => Ok(Some(
                serde_json::from_str(raw).context("failed to parse in-memory cart document")?,
            )),
        }
    }

    fn save(&self, snapshot: &CartSnapshot) -> anyhow::Result<()> {
        let payload =
            serde_json::to_string(snapshot).context("failed to serialize cart snapshot")?;
        let mut doc = self
            .doc
            .lock()
            .map_err(|_| anyhow::anyhow!("cart document lock poisoned"))?;
        *doc = Some(payload);
        Ok(())
    }
}

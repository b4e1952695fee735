//! The cart state container.
//!
//! Every mutation funnels through a single worker task that owns the cart
//! and applies commands in issue order. Overlapping operations on the same
//! product therefore cannot lose an update to completion-order races: each
//! command reads the cart as it is when the command is applied, not as it
//! was when the caller issued it.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;
use uuid::Uuid;

use storefront_cart::{Cart, CartItem};
use storefront_catalog::CatalogApi;
use storefront_core::ProductId;

use crate::error::StoreError;
use crate::notify::{Notice, Notifier};
use crate::storage::{CartSnapshot, CartStorage};

/// Tuning knobs for the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the mutation command channel; senders queue beyond it.
    pub command_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { command_buffer: 32 }
    }
}

/// A cart mutation queued for the worker.
struct QueuedMutation {
    id: Uuid,
    issued_at: DateTime<Utc>,
    op: Mutation,
    reply: oneshot::Sender<Result<(), StoreError>>,
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Add { product_id: ProductId },
    Remove { product_id: ProductId },
    SetAmount { product_id: ProductId, amount: u32 },
}

/// Handle to the cart store; cheap to clone and safe to share across tasks.
///
/// Constructed with [`CartStore::spawn`], which must run inside a Tokio
/// runtime. Dropping every handle closes the command channel and shuts the
/// worker down.
#[derive(Clone)]
pub struct CartStore {
    tx: mpsc::Sender<QueuedMutation>,
    read_model: watch::Receiver<Cart>,
}

impl CartStore {
    /// Load the persisted cart and start the mutation worker.
    ///
    /// An unreadable cart document fails closed: the store starts with an
    /// empty cart and the next successful mutation overwrites the document.
    pub fn spawn<C, S, N>(config: StoreConfig, catalog: C, storage: S, notifier: N) -> Self
    where
        C: CatalogApi + 'static,
        S: CartStorage + 'static,
        N: Notifier + 'static,
    {
        let cart = match storage.load() {
            Ok(Some(snapshot)) => {
                tracing::debug!(
                    items = snapshot.cart.len(),
                    saved_at = %snapshot.saved_at,
                    "restored cart from storage"
                );
                snapshot.cart
            }
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "cart document unreadable; starting with an empty cart");
                Cart::new()
            }
        };

        let (read_tx, read_rx) = watch::channel(cart.clone());
        let (tx, rx) = mpsc::channel(config.command_buffer);

        let worker = Worker {
            catalog,
            storage,
            notifier,
            cart,
            read_model: read_tx,
        };
        tokio::spawn(worker.run(rx));

        Self {
            tx,
            read_model: read_rx,
        }
    }

    /// Current cart contents (read-only snapshot).
    pub fn cart(&self) -> Cart {
        self.read_model.borrow().clone()
    }

    /// Add one unit of the product, inserting a new line on first add.
    ///
    /// The remote stock level is checked first; on violation the cart is
    /// unchanged and [`Notice::StockExceeded`] is emitted.
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), StoreError> {
        self.submit(Mutation::Add { product_id }).await
    }

    /// Drop the product's line from the cart.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), StoreError> {
        self.submit(Mutation::Remove { product_id }).await
    }

    /// Set the product's amount to an explicit value.
    ///
    /// An amount of zero is a documented no-op: `Ok` without touching the
    /// cart and without a notice, whether or not the product is present.
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<(), StoreError> {
        self.submit(Mutation::SetAmount { product_id, amount }).await
    }

    async fn submit(&self, op: Mutation) -> Result<(), StoreError> {
        let (reply, rx) = oneshot::channel();
        let queued = QueuedMutation {
            id: Uuid::now_v7(),
            issued_at: Utc::now(),
            op,
            reply,
        };

        self.tx.send(queued).await.map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::Closed)?
    }
}

/// The single owner of the cart state.
struct Worker<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    cart: Cart,
    read_model: watch::Sender<Cart>,
}

impl<C, S, N> Worker<C, S, N>
where
    C: CatalogApi,
    S: CartStorage,
    N: Notifier,
{
    async fn run(mut self, mut rx: mpsc::Receiver<QueuedMutation>) {
        tracing::debug!("cart worker started");

        while let Some(cmd) = rx.recv().await {
            let span = tracing::debug_span!(
                "cart_mutation",
                command_id = %cmd.id,
                issued_at = %cmd.issued_at,
            );
            let result = self.apply(cmd.op).instrument(span).await;

            if cmd.reply.send(result).is_err() {
                tracing::debug!(command_id = %cmd.id, "caller dropped before the reply");
            }
        }

        tracing::debug!("cart worker stopped");
    }

    async fn apply(&mut self, op: Mutation) -> Result<(), StoreError> {
        match op {
            Mutation::Add { product_id } => {
                let result = self.add(product_id).await;
                if let Err(err) = &result {
                    tracing::warn!(product_id = %product_id, error = %err, "add failed");
                    self.notifier.notify(match err {
                        StoreError::StockExceeded { .. } => Notice::StockExceeded,
                        _ => Notice::AddFailed,
                    });
                }
                result
            }
            Mutation::Remove { product_id } => {
                let result = self.remove(product_id);
                if let Err(err) = &result {
                    tracing::warn!(product_id = %product_id, error = %err, "remove failed");
                    self.notifier.notify(Notice::RemoveFailed);
                }
                result
            }
            Mutation::SetAmount { product_id, amount } => {
                if amount == 0 {
                    // Documented floor policy: zero is silently ignored.
                    return Ok(());
                }
                let result = self.set_amount(product_id, amount).await;
                if let Err(err) = &result {
                    tracing::warn!(product_id = %product_id, amount, error = %err, "update failed");
                    self.notifier.notify(match err {
                        StoreError::StockExceeded { .. } => Notice::StockExceeded,
                        _ => Notice::UpdateFailed,
                    });
                }
                result
            }
        }
    }

    async fn add(&mut self, product_id: ProductId) -> Result<(), StoreError> {
        let stock = self.catalog.fetch_stock(product_id).await?;
        let current = self.cart.get(product_id).map(|item| item.amount).unwrap_or(0);
        let requested = current + 1;

        if requested > stock.amount {
            return Err(StoreError::StockExceeded {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        if current > 0 {
            return self.set_amount(product_id, requested).await;
        }

        let record = self.catalog.fetch_product(product_id).await?;
        let mut next = self.cart.clone();
        next.insert(CartItem {
            id: record.id,
            title: record.title,
            price: record.price,
            image: record.image,
            amount: 1,
        })?;

        self.commit(next)
    }

    fn remove(&mut self, product_id: ProductId) -> Result<(), StoreError> {
        if !self.cart.contains(product_id) {
            return Err(StoreError::NotInCart(product_id));
        }

        let mut next = self.cart.clone();
        let removed = next.remove(product_id)?;
        tracing::debug!(product_id = %product_id, title = %removed.title, "removed cart line");

        self.commit(next)
    }

    async fn set_amount(&mut self, product_id: ProductId, amount: u32) -> Result<(), StoreError> {
        if !self.cart.contains(product_id) {
            return Err(StoreError::NotInCart(product_id));
        }

        let stock = self.catalog.fetch_stock(product_id).await?;
        if amount > stock.amount {
            return Err(StoreError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        next.set_amount(product_id, amount)?;

        self.commit(next)
    }

    /// Persist `next`, then make it the authoritative cart.
    ///
    /// Persisting first keeps the stored document a mirror of the in-memory
    /// state: a failed write leaves both sides on the previous cart.
    fn commit(&mut self, next: Cart) -> Result<(), StoreError> {
        let snapshot = CartSnapshot::of(&next);
        self.storage.save(&snapshot).map_err(StoreError::Storage)?;

        self.cart = next;
        self.read_model.send_replace(self.cart.clone());
        tracing::debug!(items = self.cart.len(), "cart committed");
        Ok(())
    }
}

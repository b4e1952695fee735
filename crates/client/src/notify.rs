//! User-facing notices.

/// Short, fixed messages the storefront surfaces to the end user.
///
/// The store reports every failure twice: as a typed [`crate::StoreError`]
/// to the caller, and as a `Notice` routed to the injected [`Notifier`] so a
/// presentation layer can toast it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    StockExceeded,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::StockExceeded => "Requested quantity exceeds available stock",
            Notice::AddFailed => "Failed to add product to the cart",
            Notice::RemoveFailed => "Failed to remove product from the cart",
            Notice::UpdateFailed => "Failed to update product quantity",
        }
    }
}

/// Sink for user-facing notices; the UI supplies a toast-backed
/// implementation.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<N> Notifier for std::sync::Arc<N>
where
    N: Notifier + ?Sized,
{
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Default notifier: logs notices at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(notice = ?notice, message = notice.message(), "cart notice");
    }
}

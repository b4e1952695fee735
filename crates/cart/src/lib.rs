//! `storefront-cart` — the pure cart domain.
//!
//! Holds the ordered, id-unique item collection and its invariant-preserving
//! mutation primitives. No I/O lives here; persistence and stock checks are
//! the caller's concern.

pub mod item;

pub use item::{Cart, CartItem};

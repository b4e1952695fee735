use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ProductId};

/// A single product line in the cart, including its session-local `amount`.
///
/// `title`, `price` and `image` are display data carried verbatim from the
/// catalog; the cart does no arithmetic on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub amount: u32,
}

/// Ordered, id-unique collection of cart items.
///
/// Serializes as a bare JSON array so the persisted form is exactly the item
/// sequence. Items keep insertion order; `set_amount` never reorders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from an item sequence, re-checking uniqueness and amounts.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> DomainResult<Self> {
        let mut cart = Cart::new();
        for item in items {
            cart.insert(item)?;
        }
        Ok(cart)
    }

    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Append a new line at the end of the cart.
    pub fn insert(&mut self, item: CartItem) -> DomainResult<()> {
        if item.amount == 0 {
            return Err(DomainError::validation("amount must be at least 1"));
        }
        if self.contains(item.id) {
            return Err(DomainError::conflict(format!(
                "product {} is already in the cart",
                item.id
            )));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove the line with the given id, returning it.
    pub fn remove(&mut self, id: ProductId) -> DomainResult<CartItem> {
        let pos = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.items.remove(pos))
    }

    /// Replace the amount of an existing line; every other field is untouched.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> DomainResult<()> {
        if amount == 0 {
            return Err(DomainError::validation("amount must be at least 1"));
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(DomainError::NotFound)?;
        item.amount = amount;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = core::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, amount: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: 19.9,
            image: format!("https://cdn.example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn insert_appends_in_order() {
        let mut cart = Cart::new();
        cart.insert(item(1, 1)).unwrap();
        cart.insert(item(2, 3)).unwrap();

        let ids: Vec<u64> = cart.iter().map(|i| i.id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut cart = Cart::new();
        cart.insert(item(1, 1)).unwrap();

        let err = cart.insert(item(1, 2)).unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for duplicate id"),
        }
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn insert_rejects_zero_amount() {
        let mut cart = Cart::new();
        let err = cart.insert(item(1, 0)).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for zero amount"),
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_returns_the_line_and_shrinks_the_cart() {
        let mut cart = Cart::new();
        cart.insert(item(1, 1)).unwrap();
        cart.insert(item(2, 2)).unwrap();

        let removed = cart.remove(ProductId::new(1)).unwrap();
        assert_eq!(removed.id, ProductId::new(1));
        assert_eq!(cart.len(), 1);
        assert!(!cart.contains(ProductId::new(1)));
    }

    #[test]
    fn remove_missing_id_is_not_found() {
        let mut cart = Cart::new();
        let err = cart.remove(ProductId::new(7)).unwrap_err();
        match err {
            DomainError::NotFound => {}
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn set_amount_preserves_identity_fields() {
        let mut cart = Cart::new();
        cart.insert(item(1, 2)).unwrap();

        cart.set_amount(ProductId::new(1), 5).unwrap();

        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.amount, 5);
        assert_eq!(line.title, "Product 1");
        assert_eq!(line.price, 19.9);
        assert_eq!(line.image, "https://cdn.example.com/1.jpg");
    }

    #[test]
    fn set_amount_missing_id_is_not_found() {
        let mut cart = Cart::new();
        let err = cart.set_amount(ProductId::new(7), 3).unwrap_err();
        match err {
            DomainError::NotFound => {}
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn set_amount_rejects_zero() {
        let mut cart = Cart::new();
        cart.insert(item(1, 2)).unwrap();

        let err = cart.set_amount(ProductId::new(1), 0).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for zero amount"),
        }
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    }

    #[test]
    fn serializes_as_bare_array() {
        let mut cart = Cart::new();
        cart.insert(item(1, 2)).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 1);

        let reloaded: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn from_items_rechecks_invariants() {
        let err = Cart::from_items(vec![item(1, 1), item(1, 2)]).unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for duplicate id"),
        }
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn apply_ops(ops: &[(u64, u32)]) -> Cart {
            let mut cart = Cart::new();
            for &(id, amount) in ops {
                let pid = ProductId::new(id);
                if cart.contains(pid) {
                    let _ = cart.set_amount(pid, amount);
                } else {
                    let _ = cart.insert(item(id, amount));
                }
            }
            cart
        }

        proptest! {
            /// Property: ids stay unique no matter what sequence of inserts
            /// and amount updates is applied.
            #[test]
            fn ids_stay_unique(ops in proptest::collection::vec((1u64..20, 0u32..10), 0..50)) {
                let cart = apply_ops(&ops);
                let mut ids: Vec<u64> = cart.iter().map(|i| i.id.as_u64()).collect();
                let before = ids.len();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(before, ids.len());
            }

            /// Property: every line in the cart has a positive amount.
            #[test]
            fn amounts_stay_positive(ops in proptest::collection::vec((1u64..20, 0u32..10), 0..50)) {
                let cart = apply_ops(&ops);
                for line in &cart {
                    prop_assert!(line.amount >= 1);
                }
            }

            /// Property: serde round-trip reconstructs an identical cart.
            #[test]
            fn serde_round_trip(ops in proptest::collection::vec((1u64..20, 1u32..10), 0..50)) {
                let cart = apply_ops(&ops);
                let json = serde_json::to_string(&cart).unwrap();
                let reloaded: Cart = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(reloaded, cart);
            }

            /// Property: removal deletes exactly the targeted line and keeps
            /// the order of the rest.
            #[test]
            fn remove_keeps_order(ops in proptest::collection::vec((1u64..20, 1u32..10), 1..50)) {
                let mut cart = apply_ops(&ops);
                let target = cart.iter().map(|i| i.id).next();
                if let Some(target) = target {
                    let expected: Vec<u64> = cart
                        .iter()
                        .filter(|i| i.id != target)
                        .map(|i| i.id.as_u64())
                        .collect();
                    cart.remove(target).unwrap();
                    let after: Vec<u64> = cart.iter().map(|i| i.id.as_u64()).collect();
                    prop_assert_eq!(after, expected);
                    prop_assert!(!cart.contains(target));
                }
            }
        }
    }
}

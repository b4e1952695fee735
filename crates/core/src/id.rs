//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product.
///
/// The catalog service assigns numeric ids; the cart never mints its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ProductId> for u64 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("ProductId: {e}")))?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_id() {
        let id: ProductId = "42".parse().unwrap();
        assert_eq!(id, ProductId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_id() {
        let err = "abc".parse::<ProductId>().unwrap_err();
        match err {
            DomainError::InvalidId(_) => {}
            _ => panic!("Expected InvalidId error"),
        }
    }
}

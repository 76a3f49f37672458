//! Cart line type.

use serde::{Deserialize, Serialize};

use tcg_store_core::Price;

use super::product::{Product, ProductKey};

/// One product in the cart and how many of it.
///
/// The product is an embedded snapshot taken when it was first added, not a
/// reference into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// A new line holding a single unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Identity of the line (identity of its product).
    #[must_use]
    pub fn key(&self) -> ProductKey {
        self.product.key()
    }

    /// `price × quantity`.
    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

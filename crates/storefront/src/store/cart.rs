//! Cart state manager.
//!
//! The cart is one JSON list under [`keys::CART`]. Every mutation is a single
//! read-modify-write of that list through [`Preferences::modify_json`], so
//! the line to change is always resolved against the latest committed cart,
//! never against a line object the caller may have held on to.

use futures::{Stream, StreamExt};
use tracing::instrument;

use tcg_store_core::Price;

use super::{Preferences, StoreError, keys};
use crate::models::{CartLine, Product, ProductKey};

/// Cart operations over the preference store.
#[derive(Debug, Clone)]
pub struct CartManager {
    prefs: Preferences,
}

impl CartManager {
    /// Create a cart manager.
    #[must_use]
    pub const fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// Current cart lines. Absent or unreadable carts read as empty.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        sanitize(self.prefs.read_json(keys::CART))
    }

    /// Stream of cart snapshots, starting with the current cart.
    pub fn observe(&self) -> impl Stream<Item = Vec<CartLine>> + Send + use<> {
        self.prefs
            .observe_json::<Vec<CartLine>>(keys::CART)
            .map(sanitize)
    }

    /// Add one unit of `product`.
    ///
    /// Bumps the quantity of the line with the same product key, or appends
    /// a new line with quantity 1. An existing line keeps the product
    /// snapshot it was created with.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be written.
    #[instrument(skip(self, product), fields(product = %product.key()))]
    pub async fn add(&self, product: &Product) -> Result<(), StoreError> {
        let key = product.key();
        self.modify(|lines| {
            match lines.iter_mut().find(|line| line.key() == key) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => lines.push(CartLine::new(product.clone())),
            }
            true
        })
        .await?;
        tracing::debug!("added to cart");
        Ok(())
    }

    /// Add one unit to the cart line matching `line`'s product.
    ///
    /// Returns `false` (and writes nothing) if no such line exists anymore.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be written.
    #[instrument(skip(self, line), fields(product = %line.key()))]
    pub async fn increment(&self, line: &CartLine) -> Result<bool, StoreError> {
        let key = line.key();
        self.modify(|lines| {
            lines
                .iter_mut()
                .find(|l| l.key() == key)
                .map(|l| l.quantity = l.quantity.saturating_add(1))
                .is_some()
        })
        .await
    }

    /// Remove one unit from the cart line matching `line`'s product.
    ///
    /// A line at quantity 1 is removed entirely. Returns `false` (and writes
    /// nothing) if no such line exists anymore.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be written.
    #[instrument(skip(self, line), fields(product = %line.key()))]
    pub async fn decrement(&self, line: &CartLine) -> Result<bool, StoreError> {
        let key = line.key();
        self.modify(|lines| {
            let Some(pos) = lines.iter().position(|l| l.key() == key) else {
                return false;
            };
            if let Some(existing) = lines.get_mut(pos).filter(|l| l.quantity > 1) {
                existing.quantity -= 1;
            } else {
                lines.remove(pos);
            }
            true
        })
        .await
    }

    /// Drop the cart line matching `line`'s product, whatever its quantity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be written.
    #[instrument(skip(self, line), fields(product = %line.key()))]
    pub async fn remove(&self, line: &CartLine) -> Result<bool, StoreError> {
        let key = line.key();
        self.remove_key(&key).await
    }

    /// Drop the cart line with product key `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be written.
    pub async fn remove_key(&self, key: &ProductKey) -> Result<bool, StoreError> {
        self.modify(|lines| {
            let before = lines.len();
            lines.retain(|l| &l.key() != key);
            lines.len() != before
        })
        .await
    }

    /// Empty the cart by removing its key from the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.prefs.remove(keys::CART).await
    }

    /// Sum of line subtotals of the current cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines().iter().map(CartLine::subtotal).sum()
    }

    /// Number of units in the current cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines()
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.quantity))
    }

    async fn modify<F>(&self, f: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut Vec<CartLine>) -> bool,
    {
        self.prefs
            .modify_json(keys::CART, |lines: &mut Vec<CartLine>| {
                let dropped = drop_empty_lines(lines);
                f(lines) || dropped
            })
            .await
    }
}

/// Zero-quantity lines are never observed.
fn sanitize(mut lines: Vec<CartLine>) -> Vec<CartLine> {
    drop_empty_lines(&mut lines);
    lines
}

fn drop_empty_lines(lines: &mut Vec<CartLine>) -> bool {
    let before = lines.len();
    lines.retain(|line| line.quantity > 0);
    lines.len() != before
}

//! Locally added catalog products.

use futures::Stream;
use tracing::instrument;

use super::{Preferences, StoreError, keys};
use crate::models::{Product, ProductKey};

/// Product list stored under [`keys::PRODUCTS`].
#[derive(Debug, Clone)]
pub struct Catalog {
    prefs: Preferences,
}

impl Catalog {
    /// Create a catalog.
    #[must_use]
    pub const fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// Append `product` to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be written.
    #[instrument(skip(self, product), fields(product = %product.key()))]
    pub async fn add(&self, product: &Product) -> Result<(), StoreError> {
        self.prefs
            .modify_json(keys::PRODUCTS, |products: &mut Vec<Product>| {
                products.push(product.clone());
                true
            })
            .await?;
        tracing::debug!("product added");
        Ok(())
    }

    /// Remove every product with key `key`. Returns whether any was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be written.
    #[instrument(skip(self), fields(product = %key))]
    pub async fn remove(&self, key: &ProductKey) -> Result<bool, StoreError> {
        self.prefs
            .modify_json(keys::PRODUCTS, |products: &mut Vec<Product>| {
                let before = products.len();
                products.retain(|p| &p.key() != key);
                products.len() != before
            })
            .await
    }

    /// Current products, in insertion order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.prefs.read_json(keys::PRODUCTS)
    }

    /// The first product with key `key`.
    #[must_use]
    pub fn find(&self, key: &ProductKey) -> Option<Product> {
        self.products().into_iter().find(|p| &p.key() == key)
    }

    /// Stream of the product list, starting with the current one.
    pub fn observe(&self) -> impl Stream<Item = Vec<Product>> + Send + use<> {
        self.prefs.observe_json(keys::PRODUCTS)
    }
}

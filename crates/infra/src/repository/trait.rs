use std::sync::Arc;

use thiserror::Error;

use batchline_allocation::Product;
use batchline_core::{ExpectedVersion, Sku};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A product for this SKU is already stored.
    #[error("duplicate product: {0}")]
    Duplicate(Sku),

    /// No product is stored for this SKU.
    #[error("product not found: {0}")]
    NotFound(Sku),

    /// The stored version moved on since the product was loaded.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// The backing store is unusable (e.g. a poisoned lock).
    #[error("repository unavailable: {0}")]
    Poisoned(String),
}

/// Storage abstraction for `Product` aggregates, keyed by SKU.
///
/// `get` hands out an owned copy; changes only become visible through `save`.
pub trait ProductRepository: Send + Sync {
    fn get(&self, sku: &Sku) -> Result<Option<Product>, RepositoryError>;

    fn add(&self, product: Product) -> Result<(), RepositoryError>;

    /// Replace the stored product if its version still equals `expected`.
    fn save(&self, product: Product, expected: ExpectedVersion) -> Result<(), RepositoryError>;

    /// All stored SKUs, sorted.
    fn list_skus(&self) -> Result<Vec<Sku>, RepositoryError>;
}

impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    fn get(&self, sku: &Sku) -> Result<Option<Product>, RepositoryError> {
        (**self).get(sku)
    }

    fn add(&self, product: Product) -> Result<(), RepositoryError> {
        (**self).add(product)
    }

    fn save(&self, product: Product, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).save(product, expected)
    }

    fn list_skus(&self) -> Result<Vec<Sku>, RepositoryError> {
        (**self).list_skus()
    }
}

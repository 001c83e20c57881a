use std::collections::HashMap;
use std::sync::RwLock;

use batchline_allocation::Product;
use batchline_core::{AggregateRoot, ExpectedVersion, Sku};

use super::r#trait::{ProductRepository, RepositoryError};

/// In-memory product repository.
///
/// Intended for tests/dev. Writers are serialized by the lock; stale writers are
/// rejected by the version check in `save`.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<Sku, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products
            .into_iter()
            .map(|p| (p.sku().clone(), p))
            .collect();
        Self {
            products: RwLock::new(map),
        }
    }
}

fn poisoned<E>(_: E) -> RepositoryError {
    RepositoryError::Poisoned("lock poisoned".to_string())
}

impl ProductRepository for InMemoryProductRepository {
    fn get(&self, sku: &Sku) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products.get(sku).cloned())
    }

    fn add(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().map_err(poisoned)?;
        if products.contains_key(product.sku()) {
            return Err(RepositoryError::Duplicate(product.sku().clone()));
        }
        products.insert(product.sku().clone(), product);
        Ok(())
    }

    fn save(&self, product: Product, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let mut products = self.products.write().map_err(poisoned)?;
        let stored = products
            .get_mut(product.sku())
            .ok_or_else(|| RepositoryError::NotFound(product.sku().clone()))?;

        expected
            .check(stored.version())
            .map_err(|e| RepositoryError::Concurrency(format!("{}: {e}", product.sku())))?;

        *stored = product;
        Ok(())
    }

    fn list_skus(&self) -> Result<Vec<Sku>, RepositoryError> {
        let products = self.products.read().map_err(poisoned)?;
        let mut skus: Vec<Sku> = products.keys().cloned().collect();
        skus.sort();
        Ok(skus)
    }
}

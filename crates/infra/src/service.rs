//! Allocation service (application-level orchestration).
//!
//! Each operation follows the same pipeline against a single SKU:
//!
//! ```text
//! 1. Load the product aggregate from the repository
//!   ↓
//! 2. Decide + mutate in memory (pure domain logic)
//!   ↓
//! 3. Save with an optimistic version check
//! ```
//!
//! Nothing is retried here. An `OutOfStock` or `Concurrency` error goes back to
//! the caller, who may retry after restocking or reloading.

use chrono::{DateTime, Utc};
use thiserror::Error;

use batchline_allocation::{Batch, OrderLine, Product};
use batchline_core::{AggregateRoot, BatchRef, DomainError, ExpectedVersion, OrderId, Sku};

use crate::repository::{ProductRepository, RepositoryError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No batch of the SKU can take the order line.
    #[error("out of stock")]
    OutOfStock,

    /// No product (and so no batch) exists for the SKU.
    #[error("invalid sku: {0}")]
    InvalidSku(Sku),

    /// Another writer saved the product first.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    #[error(transparent)]
    Domain(DomainError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::OutOfStock => ServiceError::OutOfStock,
            other => ServiceError::Domain(other),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Concurrency(msg) => ServiceError::Concurrency(msg),
            other => ServiceError::Repository(other),
        }
    }
}

/// Entry point used by transports (HTTP, CLI, message consumers).
#[derive(Debug)]
pub struct AllocationService<R> {
    repository: R,
}

impl<R> AllocationService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

impl<R> AllocationService<R>
where
    R: ProductRepository,
{
    /// Register a new batch; the product is created with its first batch.
    pub fn add_batch(
        &self,
        reference: impl Into<BatchRef>,
        sku: impl Into<Sku>,
        quantity: i64,
        eta: Option<DateTime<Utc>>,
    ) -> Result<(), ServiceError> {
        let batch = Batch::new(reference, sku, quantity, eta);
        let sku = batch.sku().clone();
        let reference = batch.reference().clone();

        match self.repository.get(&sku)? {
            Some(mut product) => {
                let expected = ExpectedVersion::Exact(product.version());
                product.add_batch(batch)?;
                self.repository.save(product, expected)?;
            }
            None => {
                let mut product = Product::new(sku.clone());
                product.add_batch(batch)?;
                self.repository.add(product)?;
            }
        }

        tracing::info!(
            "Added batch {} for {} (quantity: {}, eta: {:?})",
            reference,
            sku,
            quantity,
            eta
        );
        Ok(())
    }

    /// Allocate an order line and return the reference of the chosen batch.
    pub fn allocate(
        &self,
        order_id: impl Into<OrderId>,
        sku: impl Into<Sku>,
        quantity: i64,
    ) -> Result<BatchRef, ServiceError> {
        let line = OrderLine::new(order_id, sku, quantity);
        let mut product = self.load(&line.sku)?;
        let loaded_version = product.version();

        let reference = match product.allocate(&line) {
            Ok(reference) => reference,
            Err(DomainError::OutOfStock) => {
                tracing::warn!(
                    "Out of stock: order {} wants {} x {}",
                    line.order_id,
                    line.quantity,
                    line.sku
                );
                return Err(ServiceError::OutOfStock);
            }
            Err(e) => return Err(e.into()),
        };

        // An already-held line leaves the product as loaded; nothing to save.
        if product.version() != loaded_version {
            self.repository
                .save(product, ExpectedVersion::Exact(loaded_version))?;
        }

        tracing::info!(
            "Allocated order {} ({} x {}) to batch {}",
            line.order_id,
            line.quantity,
            line.sku,
            reference
        );
        Ok(reference)
    }

    /// Release a previously allocated line. Returns the batch it was held by,
    /// or `None` when the line was not allocated (nothing is saved then).
    pub fn deallocate(
        &self,
        order_id: impl Into<OrderId>,
        sku: impl Into<Sku>,
        quantity: i64,
    ) -> Result<Option<BatchRef>, ServiceError> {
        let line = OrderLine::new(order_id, sku, quantity);
        let mut product = self.load(&line.sku)?;
        let expected = ExpectedVersion::Exact(product.version());

        let Some(reference) = product.deallocate(&line) else {
            tracing::debug!(
                "Order {} has no allocation of {} x {}",
                line.order_id,
                line.quantity,
                line.sku
            );
            return Ok(None);
        };

        self.repository.save(product, expected)?;

        tracing::info!(
            "Deallocated order {} ({} x {}) from batch {}",
            line.order_id,
            line.quantity,
            line.sku,
            reference
        );
        Ok(Some(reference))
    }

    /// Units still available across every batch of `sku`.
    pub fn available_quantity(&self, sku: impl Into<Sku>) -> Result<i64, ServiceError> {
        let product = self.load(&sku.into())?;
        Ok(product.available_quantity())
    }

    fn load(&self, sku: &Sku) -> Result<Product, ServiceError> {
        self.repository
            .get(sku)?
            .ok_or_else(|| ServiceError::InvalidSku(sku.clone()))
    }
}

//! Product aggregate: every batch of one SKU behind a single version counter.

use batchline_core::{AggregateRoot, BatchRef, DomainError, DomainResult, Entity, Sku};

use crate::allocate::allocate;
use crate::batch::{saturate, Batch};
use crate::order_line::OrderLine;

/// Aggregate root: Product.
///
/// Owns every batch of a single SKU. Allocation for a SKU goes through its
/// product so that one consistency boundary (and one version counter) guards
/// all of that SKU's batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    sku: Sku,
    batches: Vec<Batch>,
    version: u64,
}

impl Product {
    pub fn new(sku: impl Into<Sku>) -> Self {
        Self {
            sku: sku.into(),
            batches: Vec::new(),
            version: 0,
        }
    }

    /// Build a product from existing batches (e.g. loaded from storage).
    ///
    /// The version starts at 0 regardless of how many batches are supplied.
    pub fn with_batches(
        sku: impl Into<Sku>,
        batches: impl IntoIterator<Item = Batch>,
    ) -> DomainResult<Self> {
        let mut product = Self::new(sku);
        for batch in batches {
            product.ensure_can_add(&batch)?;
            product.batches.push(batch);
        }
        Ok(product)
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch(&self, reference: &BatchRef) -> Option<&Batch> {
        self.batches.iter().find(|b| b.reference() == reference)
    }

    /// Units still available across all batches of this product.
    pub fn available_quantity(&self) -> i64 {
        saturate(
            self.batches
                .iter()
                .map(|b| i128::from(b.available_quantity()))
                .sum(),
        )
    }

    pub fn add_batch(&mut self, batch: Batch) -> DomainResult<()> {
        self.ensure_can_add(&batch)?;
        self.batches.push(batch);
        self.version += 1;
        Ok(())
    }

    /// Allocate `line` to the preferred batch of this product.
    ///
    /// A line already held by one of the batches stays where it is: its
    /// reference is returned and nothing changes, version included.
    ///
    /// Fails with `OutOfStock` (version unchanged) when no batch can take it.
    pub fn allocate(&mut self, line: &OrderLine) -> DomainResult<BatchRef> {
        if let Some(holder) = self.batches.iter().find(|b| b.is_allocated(line)) {
            return Ok(holder.reference().clone());
        }

        let reference = allocate(line, &mut self.batches)?;
        self.version += 1;
        Ok(reference)
    }

    /// Release `line` from whichever batch holds it.
    pub fn deallocate(&mut self, line: &OrderLine) -> Option<BatchRef> {
        let batch = self.batches.iter_mut().find(|b| b.is_allocated(line))?;
        batch.deallocate(line);
        self.version += 1;
        Some(batch.reference().clone())
    }

    fn ensure_can_add(&self, batch: &Batch) -> DomainResult<()> {
        if batch.sku() != &self.sku {
            return Err(DomainError::invariant(format!(
                "batch {} stocks {}, not {}",
                batch.reference(),
                batch.sku(),
                self.sku
            )));
        }
        if self.batches.iter().any(|b| b.same_identity_as(batch)) {
            return Err(DomainError::conflict(format!(
                "batch {} already exists",
                batch.reference()
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for Product {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn test_product() -> Product {
        let tomorrow = Utc::now() + Duration::days(1);
        Product::with_batches(
            "RETRO-CLOCK",
            [
                Batch::shipment("shipment-batch", "RETRO-CLOCK", 100, tomorrow),
                Batch::in_stock("in-stock-batch", "RETRO-CLOCK", 20),
            ],
        )
        .unwrap()
    }

    #[test]
    fn allocate_prefers_in_stock_and_bumps_version() {
        let mut product = test_product();
        assert_eq!(product.version(), 0);

        let reference = product
            .allocate(&OrderLine::new("order-1", "RETRO-CLOCK", 10))
            .unwrap();

        assert_eq!(reference, BatchRef::from("in-stock-batch"));
        assert_eq!(product.version(), 1);
        assert_eq!(product.batch(&reference).unwrap().available_quantity(), 10);
        assert_eq!(product.available_quantity(), 110);
    }

    #[test]
    fn repeat_allocation_stays_with_an_exactly_filled_batch() {
        let tomorrow = Utc::now() + Duration::days(1);
        let mut product = Product::with_batches(
            "LAMP",
            [
                Batch::in_stock("a", "LAMP", 2),
                Batch::shipment("b", "LAMP", 10, tomorrow),
            ],
        )
        .unwrap();
        let line = OrderLine::new("o1", "LAMP", 2);

        let first = product.allocate(&line).unwrap();
        let second = product.allocate(&line).unwrap();

        assert_eq!(first, BatchRef::from("a"));
        assert_eq!(second, first);
        assert_eq!(product.version(), 1);
        assert_eq!(product.available_quantity(), 10);
        let holders: Vec<&BatchRef> = product
            .batches()
            .iter()
            .filter(|b| b.is_allocated(&line))
            .map(Batch::reference)
            .collect();
        assert_eq!(holders, vec![&BatchRef::from("a")]);

        assert_eq!(product.deallocate(&line), Some(BatchRef::from("a")));
        assert_eq!(product.available_quantity(), 12);
    }

    #[test]
    fn repeat_allocation_with_room_left_does_not_bump_version() {
        let mut product = test_product();
        let line = OrderLine::new("order-1", "RETRO-CLOCK", 5);

        product.allocate(&line).unwrap();
        let after_first = product.clone();
        product.allocate(&line).unwrap();

        assert_eq!(product, after_first);
    }

    #[test]
    fn available_quantity_sums_without_overflow() {
        let product = Product::with_batches(
            "LAMP",
            [
                Batch::in_stock("a", "LAMP", i64::MAX),
                Batch::in_stock("b", "LAMP", i64::MAX),
            ],
        )
        .unwrap();
        assert_eq!(product.available_quantity(), i64::MAX);
    }

    #[test]
    fn out_of_stock_leaves_product_untouched() {
        let mut product = test_product();
        let before = product.clone();

        let err = product
            .allocate(&OrderLine::new("order-1", "RETRO-CLOCK", 500))
            .unwrap_err();

        assert_eq!(err, DomainError::OutOfStock);
        assert_eq!(product, before);
    }

    #[test]
    fn line_for_another_sku_is_out_of_stock() {
        let mut product = test_product();
        let err = product
            .allocate(&OrderLine::new("order-1", "SMALL-FORK", 1))
            .unwrap_err();
        assert!(err.is_out_of_stock());
    }

    #[test]
    fn deallocate_releases_from_the_holding_batch() {
        let mut product = test_product();
        let line = OrderLine::new("order-1", "RETRO-CLOCK", 20);
        let reference = product.allocate(&line).unwrap();

        assert_eq!(product.deallocate(&line), Some(reference));
        assert_eq!(product.available_quantity(), 120);
        assert_eq!(product.version(), 2);
    }

    #[test]
    fn deallocating_unknown_line_is_a_no_op() {
        let mut product = test_product();
        let before = product.clone();

        assert_eq!(
            product.deallocate(&OrderLine::new("never", "RETRO-CLOCK", 1)),
            None
        );
        assert_eq!(product, before);
    }

    #[test]
    fn add_batch_rejects_foreign_sku() {
        let mut product = Product::new("RETRO-CLOCK");
        let err = product
            .add_batch(Batch::in_stock("b1", "SMALL-FORK", 5))
            .unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("not RETRO-CLOCK") => {}
            _ => panic!("Expected InvariantViolation for foreign SKU"),
        }
        assert_eq!(product.version(), 0);
    }

    #[test]
    fn add_batch_rejects_duplicate_reference() {
        let mut product = Product::new("RETRO-CLOCK");
        product
            .add_batch(Batch::in_stock("b1", "RETRO-CLOCK", 5))
            .unwrap();
        let err = product
            .add_batch(Batch::in_stock("b1", "RETRO-CLOCK", 7))
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(product.batches().len(), 1);
        assert_eq!(product.version(), 1);
    }

    #[test]
    fn with_batches_validates_every_batch() {
        let err = Product::with_batches(
            "LAMP",
            [
                Batch::in_stock("b1", "LAMP", 1),
                Batch::in_stock("b1", "LAMP", 1),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}

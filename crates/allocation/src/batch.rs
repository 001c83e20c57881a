//! Batch entity: a lot of stock and the order lines allocated against it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use batchline_core::{BatchRef, Entity, Sku};

use crate::order_line::OrderLine;

/// Entity: a purchased lot of one SKU, either in stock or due to arrive.
///
/// The purchased quantity is fixed at construction; availability is derived from
/// the set of allocated order lines and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    reference: BatchRef,
    sku: Sku,
    /// `None` means the batch is already in physical stock.
    eta: Option<DateTime<Utc>>,
    purchased_quantity: i64,
    allocations: HashSet<OrderLine>,
}

impl Batch {
    pub fn new(
        reference: impl Into<BatchRef>,
        sku: impl Into<Sku>,
        purchased_quantity: i64,
        eta: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            eta,
            purchased_quantity,
            allocations: HashSet::new(),
        }
    }

    /// Batch already sitting in the warehouse.
    pub fn in_stock(
        reference: impl Into<BatchRef>,
        sku: impl Into<Sku>,
        purchased_quantity: i64,
    ) -> Self {
        Self::new(reference, sku, purchased_quantity, None)
    }

    /// Incoming shipment expected at `eta`.
    pub fn shipment(
        reference: impl Into<BatchRef>,
        sku: impl Into<Sku>,
        purchased_quantity: i64,
        eta: DateTime<Utc>,
    ) -> Self {
        Self::new(reference, sku, purchased_quantity, Some(eta))
    }

    pub fn reference(&self) -> &BatchRef {
        &self.reference
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn eta(&self) -> Option<DateTime<Utc>> {
        self.eta
    }

    pub fn purchased_quantity(&self) -> i64 {
        self.purchased_quantity
    }

    pub fn allocations(&self) -> impl Iterator<Item = &OrderLine> {
        self.allocations.iter()
    }

    pub fn is_allocated(&self, line: &OrderLine) -> bool {
        self.allocations.contains(line)
    }

    pub fn allocated_quantity(&self) -> i64 {
        saturate(self.allocated_total())
    }

    pub fn available_quantity(&self) -> i64 {
        saturate(self.available_total())
    }

    /// The sole eligibility gate: matching SKU and enough remaining capacity.
    ///
    /// Also refuses a line whose quantity would push the allocated or available
    /// totals outside `i64`, so the accessors above stay exact.
    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        if self.sku != line.sku {
            return false;
        }
        let quantity = i128::from(line.quantity);
        let available = self.available_total();
        available >= quantity
            && fits_i64(self.allocated_total() + quantity)
            && fits_i64(available - quantity)
    }

    /// Record `line` against this batch.
    ///
    /// Ineligible lines and lines already allocated are silently ignored; use
    /// [`Batch::can_allocate`] beforehand to tell the cases apart.
    pub fn allocate(&mut self, line: &OrderLine) {
        if !self.can_allocate(line) {
            return;
        }
        self.allocations.insert(line.clone());
    }

    /// Remove `line` if it is allocated here; otherwise a no-op.
    pub fn deallocate(&mut self, line: &OrderLine) {
        self.allocations.remove(line);
    }

    fn allocated_total(&self) -> i128 {
        self.allocations
            .iter()
            .map(|line| i128::from(line.quantity))
            .sum()
    }

    fn available_total(&self) -> i128 {
        i128::from(self.purchased_quantity) - self.allocated_total()
    }
}

fn fits_i64(value: i128) -> bool {
    i64::try_from(value).is_ok()
}

/// Narrow an `i128` total back to `i64`, pinning at the bounds.
///
/// Totals of a single batch always fit (`can_allocate` guarantees it); only sums
/// across batches can reach the bounds.
pub(crate) fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

impl Entity for Batch {
    type Id = BatchRef;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}

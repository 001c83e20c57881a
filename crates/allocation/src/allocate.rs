//! Batch selection: which eligible batch should fulfil an order line.

use batchline_core::{BatchRef, DomainError, DomainResult};

use crate::batch::Batch;
use crate::order_line::OrderLine;

/// Allocate `line` to the best eligible batch and return that batch's reference.
///
/// Preference order:
/// - in-stock batches (no ETA) before any shipment, however close its ETA is;
/// - among shipments, the earliest ETA first;
/// - remaining ties go to the batch that comes first in `batches`.
///
/// Only the winning batch is mutated. When no batch can take the line the call
/// fails with [`DomainError::OutOfStock`] and every batch is left untouched.
pub fn allocate<'a, I>(line: &OrderLine, batches: I) -> DomainResult<BatchRef>
where
    I: IntoIterator<Item = &'a mut Batch>,
{
    // `min_by_key` keeps the first of equal minima, which makes this a stable pick.
    let winner = batches
        .into_iter()
        .filter(|batch| batch.can_allocate(line))
        .min_by_key(|batch| (batch.eta().is_some(), batch.eta()))
        .ok_or(DomainError::OutOfStock)?;

    winner.allocate(line);
    Ok(winner.reference().clone())
}

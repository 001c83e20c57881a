//! Order line value type.

use serde::{Deserialize, Serialize};

use batchline_core::{OrderId, Sku, ValueObject};

/// Order line: a request to fulfil `quantity` units of `sku` for an order.
///
/// Compared and hashed by all three fields, so two lines with identical values
/// are the same set member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub sku: Sku,
    /// Not validated; zero or negative quantities are accepted as given.
    pub quantity: i64,
}

impl OrderLine {
    pub fn new(order_id: impl Into<OrderId>, sku: impl Into<Sku>, quantity: i64) -> Self {
        Self {
            order_id: order_id.into(),
            sku: sku.into(),
            quantity,
        }
    }
}

impl ValueObject for OrderLine {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equal_lines_collapse_in_a_set() {
        let mut set = HashSet::new();
        set.insert(OrderLine::new("order-1", "RED-CHAIR", 10));
        set.insert(OrderLine::new("order-1", "RED-CHAIR", 10));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn any_differing_field_makes_a_distinct_line() {
        let base = OrderLine::new("order-1", "RED-CHAIR", 10);
        assert_ne!(base, OrderLine::new("order-2", "RED-CHAIR", 10));
        assert_ne!(base, OrderLine::new("order-1", "BLUE-CHAIR", 10));
        assert_ne!(base, OrderLine::new("order-1", "RED-CHAIR", 11));
    }
}

//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. They are defined entirely by their
//! attribute values, so two value objects with the same values are
//! interchangeable.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (an order line for 2 × `SMALL-TABLE` on order
///   `o-1` is equal to any other line with those exact values)
/// - **Entity**: has identity (a batch stays the same batch as lines are
///   allocated against it)
///
/// ## Design Constraints
///
/// - **Clone**: values are copied, not shared
/// - **Eq + Hash**: values are compared and hashed structurally, which lets them
///   act as set members and map keys
/// - **Debug**: values show up in test failures and logs
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Money {
///     amount: i64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {}
///
/// let m1 = Money { amount: 100, currency: "USD".to_string() };
/// let m2 = Money { amount: 100, currency: "USD".to_string() };
/// assert_eq!(m1, m2);
/// ```
pub trait ValueObject: Clone + Eq + core::hash::Hash + core::fmt::Debug {}

//! Allocation domain module.
//!
//! Decides which batch of stock fulfils an order line and keeps each batch's
//! allocation bookkeeping, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod allocate;
pub mod batch;
pub mod order_line;
pub mod product;

pub use allocate::allocate;
pub use batch::Batch;
pub use order_line::OrderLine;
pub use product::Product;

//! Product repository boundary.
//!
//! Loads and saves whole `Product` aggregates by SKU, with an optimistic
//! version check on save. No storage assumptions are made here.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryProductRepository;
pub use r#trait::{ProductRepository, RepositoryError};

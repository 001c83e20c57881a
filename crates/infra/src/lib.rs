//! Infrastructure layer: product storage and the allocation service that
//! transports call into.

pub mod repository;
pub mod service;


pub use repository::{InMemoryProductRepository, ProductRepository, RepositoryError};
pub use service::{AllocationService, ServiceError};

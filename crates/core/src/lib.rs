pub mod config;
pub mod domain;
pub mod errors;

pub use domain::catalog::{Catalog, KNOWN_CATEGORIES};
pub use domain::product::{Product, ProductId, ProductInput, ProductVariant};
pub use errors::{ApplicationError, DomainError, InterfaceError};

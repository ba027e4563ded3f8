use async_trait::async_trait;
use thiserror::Error;

use samalook_core::domain::catalog::Catalog;
use samalook_core::domain::product::{Product, ProductId, ProductInput};
use samalook_core::errors::{ApplicationError, DomainError};

use crate::document::DocumentError;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileCatalogRepository;
pub use memory::InMemoryCatalogRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Domain(error) => Self::Domain(error),
            RepositoryError::Document(error) => Self::Persistence(error.to_string()),
        }
    }
}

/// The catalog operations exposed to the HTTP layer and the CLI.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Full catalog. Never fails because of an unreadable document.
    async fn list(&self) -> Result<Catalog, RepositoryError>;

    /// Stores `input` at the end of `category` under a newly allocated id.
    async fn create(&self, category: &str, input: ProductInput)
        -> Result<Product, RepositoryError>;

    /// Removes the product with `id` from whichever category holds it. Returns `false`
    /// and leaves storage untouched when no product matched.
    async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

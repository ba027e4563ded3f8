pub mod document;
pub mod fixtures;
pub mod repositories;

pub use document::{CatalogDocument, DocumentError};
pub use fixtures::{DemoCatalog, SeedResult, SeededProduct};
pub use repositories::{
    CatalogRepository, InMemoryCatalogRepository, JsonFileCatalogRepository, RepositoryError,
};

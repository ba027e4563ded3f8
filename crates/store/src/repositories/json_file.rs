use samalook_core::config::WriteFailurePolicy;
use samalook_core::domain::catalog::Catalog;
use samalook_core::domain::product::{Product, ProductId, ProductInput};
use tokio::sync::Mutex;
use tracing::{error, info};

use super::{CatalogRepository, RepositoryError};
use crate::document::CatalogDocument;

/// Catalog persisted as one JSON document.
///
/// Mutations hold `writer` for their whole load, mutate, save cycle, so within a
/// process two creates never observe the same maximum id and a create never
/// overwrites a concurrent delete. Reads skip the lock; the document is only ever
/// replaced by rename.
pub struct JsonFileCatalogRepository {
    document: CatalogDocument,
    write_failure_policy: WriteFailurePolicy,
    writer: Mutex<()>,
}

impl JsonFileCatalogRepository {
    pub fn new(document: CatalogDocument, write_failure_policy: WriteFailurePolicy) -> Self {
        Self { document, write_failure_policy, writer: Mutex::new(()) }
    }

    pub fn document(&self) -> &CatalogDocument {
        &self.document
    }

    async fn persist(&self, catalog: &Catalog) -> Result<(), RepositoryError> {
        match self.document.write(catalog).await {
            Ok(()) => Ok(()),
            Err(write_error) => match self.write_failure_policy {
                WriteFailurePolicy::Surface => Err(write_error.into()),
                WriteFailurePolicy::BestEffort => {
                    error!(
                        event_name = "store.catalog.write_dropped",
                        path = %self.document.path().display(),
                        error = %write_error,
                        "catalog write failed; reporting success under best_effort policy"
                    );
                    Ok(())
                }
            },
        }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for JsonFileCatalogRepository {
    async fn list(&self) -> Result<Catalog, RepositoryError> {
        Ok(self.document.load_or_empty().await)
    }

    async fn create(
        &self,
        category: &str,
        input: ProductInput,
    ) -> Result<Product, RepositoryError> {
        let _writer = self.writer.lock().await;

        let mut catalog = self.document.load_or_empty().await;
        let product = catalog.insert(category, input)?;
        self.persist(&catalog).await?;

        info!(
            event_name = "store.catalog.product_created",
            category = %category,
            product_id = %product.id,
            "product stored"
        );
        Ok(product)
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let _writer = self.writer.lock().await;

        let mut catalog = self.document.load_or_empty().await;
        if !catalog.remove_by_id(id) {
            return Ok(false);
        }
        self.persist(&catalog).await?;

        info!(event_name = "store.catalog.product_deleted", product_id = %id, "product removed");
        Ok(true)
    }
}

use tokio::sync::RwLock;

use samalook_core::domain::catalog::Catalog;
use samalook_core::domain::product::{Product, ProductId, ProductInput};

use super::{CatalogRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    catalog: RwLock<Catalog>,
}

impl InMemoryCatalogRepository {
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { catalog: RwLock::new(catalog) }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list(&self) -> Result<Catalog, RepositoryError> {
        let catalog = self.catalog.read().await;
        Ok(catalog.clone())
    }

    async fn create(
        &self,
        category: &str,
        input: ProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut catalog = self.catalog.write().await;
        Ok(catalog.insert(category, input)?)
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut catalog = self.catalog.write().await;
        Ok(catalog.remove_by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use samalook_core::domain::product::{ProductId, ProductInput};

    use crate::repositories::{CatalogRepository, InMemoryCatalogRepository};

    #[tokio::test]
    async fn in_memory_repo_create_list_delete() {
        let repo = InMemoryCatalogRepository::default();

        let product = repo
            .create("watches", ProductInput::new("Montre", "25 000", "/img/montre.jpg"))
            .await
            .expect("create product");
        assert_eq!(product.id, ProductId(1));

        let catalog = repo.list().await.expect("list");
        assert_eq!(catalog.find(product.id).map(|(_, found)| found), Some(&product));

        assert!(repo.delete_by_id(product.id).await.expect("delete"));
        assert!(!repo.delete_by_id(product.id).await.expect("second delete"));
        assert!(repo.list().await.expect("list").is_empty());
    }
}

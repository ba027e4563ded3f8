//! Demo catalog for local development and smoke checks.

use samalook_core::domain::catalog::KNOWN_CATEGORIES;
use samalook_core::domain::product::{ProductInput, ProductVariant};

use crate::repositories::{CatalogRepository, RepositoryError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededProduct {
    pub category: String,
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeedResult {
    Seeded(Vec<SeededProduct>),
    /// The catalog already held products and was left alone.
    Skipped { existing_products: usize },
}

pub struct DemoCatalog;

impl DemoCatalog {
    /// One product per back-office category, in category order.
    pub fn products() -> Vec<(&'static str, ProductInput)> {
        let [shoes, watches, perfumes, fabrics, dresses, pullovers] =
            KNOWN_CATEGORIES.map(|(id, _)| id);

        let mut sandals =
            ProductInput::new("Sandales en cuir", "15 000", "/images/shoes/sandales.jpg")
                .with_rating(4.5);
        sandals.sizes = Some(["38", "39", "40", "41", "42"].map(String::from).to_vec());

        let mut boubou =
            ProductInput::new("Robe boubou brodée", "35 000", "/images/dresses/boubou.jpg")
                .with_rating(4.9);
        boubou.variants = Some(vec![
            ProductVariant {
                name: "Indigo".to_string(),
                class: "bg-indigo-600".to_string(),
                image: None,
            },
            ProductVariant {
                name: "Safran".to_string(),
                class: "bg-amber-500".to_string(),
                image: Some("/images/dresses/boubou-safran.jpg".to_string()),
            },
        ]);

        vec![
            (shoes, sandals),
            (
                watches,
                ProductInput::new("Montre classique", "45 000", "/images/watches/classique.jpg")
                    .with_rating(4.7),
            ),
            (
                perfumes,
                ProductInput::new("Parfum oud", "22 500", "/images/perfumes/oud.jpg")
                    .with_rating(4.8),
            ),
            (
                fabrics,
                ProductInput::new("Wax hollandais 6 yards", "18 000", "/images/fabrics/wax.jpg")
                    .with_rating(4.6),
            ),
            (dresses, boubou),
            (
                pullovers,
                ProductInput::new("Pull en maille", "12 500", "/images/pullovers/maille.jpg")
                    .with_rating(4.4),
            ),
        ]
    }

    /// Seeds the demo products into an empty catalog. Running it again is a no-op.
    pub async fn load(repository: &dyn CatalogRepository) -> Result<SeedResult, RepositoryError> {
        let existing_products = repository.list().await?.product_count();
        if existing_products > 0 {
            return Ok(SeedResult::Skipped { existing_products });
        }

        let mut seeded = Vec::new();
        for (category, input) in Self::products() {
            let product = repository.create(category, input).await?;
            seeded.push(SeededProduct {
                category: category.to_string(),
                id: product.id.0,
                name: product.name().unwrap_or_default().to_string(),
            });
        }

        Ok(SeedResult::Seeded(seeded))
    }
}

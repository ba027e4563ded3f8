use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId, ProductInput};
use crate::errors::DomainError;

/// Categories offered by the back-office product form. The store accepts any
/// category name; this list only drives display labels and demo data.
pub const KNOWN_CATEGORIES: [(&str, &str); 6] = [
    ("shoes", "Chaussures"),
    ("watches", "Montres"),
    ("perfumes", "Parfums"),
    ("fabrics", "Tissus Sénégalais"),
    ("dresses", "Robes"),
    ("pullovers", "Pull-overs"),
];

/// Category name to ordered products. Serialized as a plain JSON object of arrays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: BTreeMap<String, Vec<Product>>,
}

impl Catalog {
    pub fn new(categories: BTreeMap<String, Vec<Product>>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Product])> {
        self.categories.iter().map(|(name, products)| (name.as_str(), products.as_slice()))
    }

    pub fn category(&self, name: &str) -> Option<&[Product]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    pub fn product_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.product_count() == 0
    }

    pub fn find(&self, id: ProductId) -> Option<(&str, &Product)> {
        if !id.is_assigned() {
            return None;
        }
        self.categories.iter().find_map(|(name, products)| {
            products
                .iter()
                .find(|product| product.id == id)
                .map(|product| (name.as_str(), product))
        })
    }

    /// One past the largest id anywhere in the catalog; `1` for an empty catalog.
    pub fn next_id(&self) -> ProductId {
        let max = self.categories.values().flatten().map(Product::claimed_id).max().unwrap_or(0);
        ProductId(max.saturating_add(1))
    }

    /// Appends `input` to `category`, creating the category on first use, and returns
    /// the stored record with its freshly allocated id.
    pub fn insert(&mut self, category: &str, input: ProductInput) -> Result<Product, DomainError> {
        if category.trim().is_empty() {
            return Err(DomainError::InvalidRequest("category must not be empty".to_string()));
        }

        let product = input.into_product(self.next_id());
        self.categories.entry(category.to_string()).or_default().push(product.clone());
        Ok(product)
    }

    /// Removes every product carrying `id` from every category. Emptied categories are
    /// kept. Returns whether anything was removed.
    /// Records without an assigned id are never matched.
    pub fn remove_by_id(&mut self, id: ProductId) -> bool {
        if !id.is_assigned() {
            return false;
        }

        let mut removed = false;
        for products in self.categories.values_mut() {
            let before = products.len();
            products.retain(|product| product.id != id);
            removed |= products.len() != before;
        }
        removed
    }
}

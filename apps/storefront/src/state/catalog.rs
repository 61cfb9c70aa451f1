//! # Product Catalog
//!
//! Read-only product records, loaded once at startup.
//!
//! The cart never consults the catalog: commands look a product up here,
//! snapshot it into a `LineItem`, and hand that to the store.

use std::collections::HashMap;
use std::path::Path;

use storefront_core::{CatalogProduct, ProductId};
use thiserror::Error;
use tracing::info;

/// The demo catalog bundled with the binary.
const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog.json");

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate product id {0} in catalog")]
    DuplicateId(ProductId),
}

/// Products indexed by id, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Builds a catalog from product records. Ids must be unique.
    pub fn new(products: Vec<CatalogProduct>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Catalog { products, index })
    }

    /// Parses a JSON array of product records.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(raw)?)
    }

    /// Loads a catalog file.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// The demo catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn get(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.index.get(&id).map(|&position| &self.products[position])
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Money, Size};

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.is_empty());

        let jordan = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(jordan.price, Money::from_cents(19999));
        assert!(jordan.sizes.contains(&Size::from("8.5")));
        assert!(jordan.sizes.contains(&Size::from("9")));

        let blazer = catalog.get(ProductId::new(3)).unwrap();
        assert!(blazer.is_out_of_stock());
    }

    #[test]
    fn test_lookup_missing() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog.get(ProductId::new(999)).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"[
            {"id": 1, "name": "A", "price": 100, "stock": 1},
            {"id": 1, "name": "B", "price": 200, "stock": 1}
        ]"#;
        assert!(matches!(Catalog::from_json(raw), Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(Catalog::from_json("{"), Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Catalog::load(Path::new("/definitely/not/here/catalog.json")).await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}

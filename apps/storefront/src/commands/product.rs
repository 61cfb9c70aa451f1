//! # Product Commands
//!
//! The product detail panel: one product, a chosen variant, and the
//! quantity picker next to its "Add to Cart" button.
//!
//! ```text
//!   Jordan 1 Retro High OG  $199.99
//!   size 9  color red
//!   [-] 2 [+]   10 available          add ──► AddToCartRequest
//! ```

use storefront_core::{CatalogProduct, ProductId, QuantitySelector, Size};
use tracing::debug;

use crate::commands::cart::{find_product, resolve_variant, AddToCartRequest};
use crate::error::ApiError;
use crate::state::Catalog;

/// An open product detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPanel {
    product: CatalogProduct,
    size: Size,
    color: String,
    picker: QuantitySelector,
}

impl ProductPanel {
    /// Opens the panel for a product with the requested (or default) variant.
    ///
    /// Out-of-stock products can be viewed; adding them is refused.
    pub fn open(
        catalog: &Catalog,
        product_id: ProductId,
        size: Option<Size>,
        color: Option<String>,
    ) -> Result<Self, ApiError> {
        debug!(product_id = %product_id, ?size, ?color, "open_product command");

        let product = find_product(catalog, product_id)?;
        let (size, color) = resolve_variant(product, size, color)?;

        Ok(ProductPanel {
            picker: QuantitySelector::for_product(product),
            product: product.clone(),
            size,
            color,
        })
    }

    pub fn product(&self) -> &CatalogProduct {
        &self.product
    }

    pub fn size(&self) -> &Size {
        &self.size
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn picker(&self) -> &QuantitySelector {
        &self.picker
    }

    /// `+` on the picker. Returns whether the quantity changed.
    pub fn increment(&mut self) -> bool {
        self.picker.increment()
    }

    /// `-` on the picker. Returns whether the quantity changed.
    pub fn decrement(&mut self) -> bool {
        self.picker.decrement()
    }

    /// The add request for the current selection.
    pub fn add_request(&self) -> Result<AddToCartRequest, ApiError> {
        let quantity = self
            .picker
            .quantity_to_add()
            .ok_or_else(|| ApiError::out_of_stock(&self.product.name))?;

        Ok(AddToCartRequest {
            product_id: self.product.id,
            size: Some(self.size.clone()),
            color: Some(self.color.clone()),
            quantity: Some(quantity),
        })
    }
}

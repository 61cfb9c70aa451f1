//! # Quantity Selector
//!
//! The stock-bounded quantity picker a product detail panel shows next to
//! its "Add to Cart" button.
//!
//! The cart itself is stock-agnostic: it adds whatever quantity it is
//! handed. Clamping against `stock` happens here, on the caller's side,
//! before the add request is made.
//!
//! ```text
//!   [ - ]  3  [ + ]   5 available
//!     │          │
//!     │          └── disabled once quantity == stock
//!     └───────────── disabled at 1
//! ```

use crate::types::CatalogProduct;
use crate::validation::MAX_QUANTITY;

/// Picker state for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySelector {
    quantity: i64,
    stock: i64,
}

impl QuantitySelector {
    /// Starts at 1 for a product with `stock` units available.
    pub fn new(stock: i64) -> Self {
        QuantitySelector { quantity: 1, stock }
    }

    /// Starts at 1 for the given catalog product.
    pub fn for_product(product: &CatalogProduct) -> Self {
        QuantitySelector::new(product.stock)
    }

    /// Current quantity.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Units available.
    #[inline]
    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// Nothing can be added when the product is out of stock.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// Whether `+` is enabled: below both the stock and the cart's line cap.
    pub fn can_increment(&self) -> bool {
        !self.is_out_of_stock() && self.quantity < self.limit()
    }

    /// Whether `-` is enabled: anything above 1.
    pub fn can_decrement(&self) -> bool {
        self.quantity > 1
    }

    /// Adds one unit if stock allows. Returns whether the value changed.
    pub fn increment(&mut self) -> bool {
        if !self.can_increment() {
            return false;
        }
        self.quantity += 1;
        true
    }

    /// Removes one unit, never going below 1. Returns whether the value changed.
    pub fn decrement(&mut self) -> bool {
        if !self.can_decrement() {
            return false;
        }
        self.quantity -= 1;
        true
    }

    /// Sets a requested quantity, clamped to `1..=stock` (and never above
    /// [`MAX_QUANTITY`]).
    ///
    /// Returns the value actually selected.
    pub fn request(&mut self, requested: i64) -> i64 {
        self.quantity = requested.clamp(1, self.limit());
        self.quantity
    }

    fn limit(&self) -> i64 {
        self.stock.clamp(1, MAX_QUANTITY)
    }

    /// The quantity to pass to the cart, or `None` when out of stock.
    pub fn quantity_to_add(&self) -> Option<i64> {
        if self.is_out_of_stock() {
            None
        } else {
            Some(self.quantity)
        }
    }
}

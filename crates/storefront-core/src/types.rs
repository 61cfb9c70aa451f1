//! # Domain Types
//!
//! Core domain types used throughout the storefront cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │   CatalogProduct    │ snapshot │      LineItem       │              │
//! │  │  ─────────────────  │ ───────► │  ─────────────────  │              │
//! │  │  id                 │          │  product_id  ┐      │              │
//! │  │  name, price        │          │  selected_size├ key │              │
//! │  │  stock              │          │  selected_color┘    │              │
//! │  │  sizes, colors      │          │  name, price, image │              │
//! │  │  image{color→url}   │          │  quantity (≥ 1)     │              │
//! │  └─────────────────────┘          └─────────────────────┘              │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │      ProductId      │          │        Size         │              │
//! │  │  u64 newtype        │          │  canonical string   │              │
//! │  └─────────────────────┘          │  9 == "9" == 9.0    │              │
//! │                                   └─────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Key
//! Two add requests refer to the same cart entry when their
//! `(product_id, selected_size, selected_color)` triples are equal. Sizes
//! are canonicalized on construction, so the comparison is plain equality.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product ID
// =============================================================================

/// Identifier of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(u64);

impl ProductId {
    /// Wraps a raw catalog identifier.
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Size
// =============================================================================

/// A product size in canonical string form.
///
/// ## Why a Newtype?
/// The catalog lists shoe sizes as numbers (`9`) and apparel sizes as
/// strings (`"M"`), and UI controls hand back whatever they were given.
/// Without one canonical form, `9` and `"9"` would produce two line items
/// for the same variant.
///
/// ## Canonical Form
/// - surrounding whitespace is trimmed
/// - integers render without a fraction: `9` → `"9"`
/// - whole floats render as integers: `9.0` → `"9"`
/// - other floats keep their shortest form: `9.5` → `"9.5"`
/// - letter case is preserved (`"M"` and `"m"` are different sizes)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct Size(String);

impl Size {
    /// Creates a size from any textual representation.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Size(raw.as_ref().trim().to_string())
    }

    /// Creates a size from a floating point value.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
            Size((value as i64).to_string())
        } else {
            Size(value.to_string())
        }
    }

    /// Returns the canonical string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the size is blank.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Size {
    fn from(raw: &str) -> Self {
        Size::new(raw)
    }
}

impl From<String> for Size {
    fn from(raw: String) -> Self {
        Size::new(raw)
    }
}

impl From<&String> for Size {
    fn from(raw: &String) -> Self {
        Size::new(raw)
    }
}

impl From<u32> for Size {
    fn from(value: u32) -> Self {
        Size(value.to_string())
    }
}

impl From<i32> for Size {
    fn from(value: i32) -> Self {
        Size(value.to_string())
    }
}

impl From<u64> for Size {
    fn from(value: u64) -> Self {
        Size(value.to_string())
    }
}

impl From<i64> for Size {
    fn from(value: i64) -> Self {
        Size(value.to_string())
    }
}

impl From<f64> for Size {
    fn from(value: f64) -> Self {
        Size::from_f64(value)
    }
}

/// Accepts JSON strings, integers and floats, canonicalizing all of them.
impl<'de> Deserialize<'de> for Size {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SizeVisitor;

        impl<'de> Visitor<'de> for SizeVisitor {
            type Value = Size;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a size as a string or a number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Size, E> {
                Ok(Size::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Size, E> {
                Ok(Size::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Size, E> {
                Ok(Size::from(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Size, E> {
                Ok(Size::from_f64(v))
            }
        }

        deserializer.deserialize_any(SizeVisitor)
    }
}

// =============================================================================
// Line Item Key
// =============================================================================

/// The `(product_id, selected_size, selected_color)` identity of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineItemKey {
    pub product_id: ProductId,
    pub selected_size: Size,
    pub selected_color: String,
}

impl LineItemKey {
    /// Builds a key, canonicalizing the size.
    pub fn new(
        product_id: impl Into<ProductId>,
        selected_size: impl Into<Size>,
        selected_color: impl Into<String>,
    ) -> Self {
        LineItemKey {
            product_id: product_id.into(),
            selected_size: selected_size.into(),
            selected_color: selected_color.into(),
        }
    }
}

impl fmt::Display for LineItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.product_id, self.selected_size, self.selected_color
        )
    }
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A read-only product record supplied by the catalog provider.
///
/// The cart never mutates these and never looks them up again after a
/// line item has been added; `stock` is informational for callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogProduct {
    #[ts(type = "number")]
    pub id: ProductId,

    pub name: String,

    /// Price in cents.
    pub price: Money,

    /// Units available. Zero or less means out of stock.
    pub stock: i64,

    #[serde(default)]
    pub sizes: Vec<Size>,

    #[serde(default)]
    pub colors: Vec<String>,

    /// Image URL per color key.
    #[serde(default)]
    pub image: HashMap<String, String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub short_description: String,
}

impl CatalogProduct {
    /// Returns true when there is nothing left to sell.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// Image for the given color, falling back to the first listed color.
    pub fn image_for(&self, color: &str) -> Option<&str> {
        self.image
            .get(color)
            .or_else(|| self.colors.first().and_then(|c| self.image.get(c)))
            .map(String::as_str)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One purchasable configuration of a product, currently in the cart.
///
/// ## Snapshot Pattern
/// `name`, `price` and `image` are frozen copies of catalog data taken when
/// the item was added, so the cart still renders correctly if the catalog
/// changes later. Adding the same variant again refreshes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    #[ts(type = "number")]
    pub product_id: ProductId,

    pub name: String,

    /// Unit price in cents at time of adding.
    pub price: Money,

    /// Image URL at time of adding.
    pub image: String,

    pub selected_size: Size,

    pub selected_color: String,

    /// Units of this variant. Always ≥ 1 while the item is in a cart.
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line item without an image.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        selected_size: impl Into<Size>,
        selected_color: impl Into<String>,
        quantity: i64,
    ) -> Self {
        LineItem {
            product_id: product_id.into(),
            name: name.into(),
            price,
            image: String::new(),
            selected_size: selected_size.into(),
            selected_color: selected_color.into(),
            quantity,
        }
    }

    /// Snapshots a catalog product into a line item for the chosen variant.
    ///
    /// The image is the one for `selected_color`, falling back to the first
    /// color's image, then to an empty string.
    pub fn from_product(
        product: &CatalogProduct,
        selected_size: impl Into<Size>,
        selected_color: impl Into<String>,
        quantity: i64,
    ) -> Self {
        let selected_color = selected_color.into();
        LineItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product
                .image_for(&selected_color)
                .unwrap_or_default()
                .to_string(),
            selected_size: selected_size.into(),
            selected_color,
            quantity,
        }
    }

    /// Sets the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Returns this item's identity key.
    pub fn key(&self) -> LineItemKey {
        LineItemKey {
            product_id: self.product_id,
            selected_size: self.selected_size.clone(),
            selected_color: self.selected_color.clone(),
        }
    }

    /// Returns true if this item has the given identity.
    pub fn matches(&self, key: &LineItemKey) -> bool {
        self.product_id == key.product_id
            && self.selected_size == key.selected_size
            && self.selected_color == key.selected_color
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

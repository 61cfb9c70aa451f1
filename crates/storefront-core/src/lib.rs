//! # storefront-core: Pure Cart Logic for the Storefront
//!
//! This crate is the **heart** of the storefront cart. It contains the cart
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       View Layer                                │   │
//! │  │    ProductCard ──► ProductInteraction ──► Cart badge           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ store operations                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 CartStore (apps/storefront)                     │   │
//! │  │    subscription, persistence writer, configuration             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   codec   │  │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │ Persisted │  │   │
//! │  │   │   Size    │  │           │  │  Totals   │  │   Cart    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogProduct, LineItem, Size, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart state machine and derived totals
//! - [`codec`] - Persisted cart record encoding/decoding
//! - [`quantity`] - Stock-bounded quantity picker used by callers
//! - [`validation`] - Line item validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, LineItem, Money, ProductId};
//!
//! let mut cart = Cart::new();
//! let shoe = LineItem::new(ProductId::new(1), "Runner", Money::from_cents(3990), 9u32, "red", 1);
//!
//! cart.add_item(shoe.clone());
//! cart.add_item(shoe);
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().cents(), 7980);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod codec;
pub mod error;
pub mod money;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use codec::PersistedCart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use quantity::QuantitySelector;
pub use types::*;
pub use validation::{MAX_NAME_LENGTH, MAX_QUANTITY};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart record is persisted under unless configured otherwise.
pub const DEFAULT_CART_STORAGE_KEY: &str = "cart";

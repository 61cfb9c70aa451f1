//! # Persisted Cart Codec
//!
//! Encodes the cart's items into the record stored under the cart storage
//! key, and decodes that record back into a [`Cart`].
//!
//! ## Record Layout
//! ```json
//! {
//!   "items": [
//!     {
//!       "productId": 1,
//!       "name": "Trail Runner",
//!       "price": 3990,
//!       "image": "/products/1r.png",
//!       "selectedSize": "9",
//!       "selectedColor": "red",
//!       "quantity": 2
//!     }
//!   ]
//! }
//! ```
//!
//! Only `items` is written; totals are always recomputed. Unknown fields
//! (at the top level or on an item) are ignored when reading. A missing or
//! mistyped field anywhere invalidates the whole record.
//!
//! ## Decode Pipeline
//! ```text
//! raw string ──► serde_json ──► PersistedCart ──► validate each item ──► Cart
//!                    │                                  │                  │
//!                    ▼                                  ▼                  │
//!           MalformedRecord                     InvalidLineItem     duplicates
//!                                                                   merged by add
//! ```

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::LineItem;
use crate::validation::validate_line_item;

/// The serialized form of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCart {
    pub items: Vec<LineItem>,
}

impl From<&Cart> for PersistedCart {
    fn from(cart: &Cart) -> Self {
        PersistedCart {
            items: cart.items().to_vec(),
        }
    }
}

impl PersistedCart {
    /// Validates every item and rebuilds a cart from them.
    ///
    /// Items are checked with the same [`validate_line_item`] rule that
    /// [`Cart::add_item`] applies, so every cart the store can hold decodes
    /// again, and nothing decodes that the store would have refused.
    ///
    /// Items sharing an identity key are merged with add semantics, so a
    /// record written by an older, looser writer still yields a cart that
    /// satisfies the uniqueness invariant.
    pub fn into_cart(self) -> CoreResult<Cart> {
        for (index, item) in self.items.iter().enumerate() {
            validate_line_item(item).map_err(|source| CoreError::InvalidLineItem { index, source })?;
        }

        Ok(self.items.into_iter().collect())
    }
}

/// Serializes the cart's items to the persisted JSON record.
pub fn encode(cart: &Cart) -> CoreResult<String> {
    Ok(serde_json::to_string(&PersistedCart::from(cart))?)
}

/// Parses and validates a persisted JSON record.
pub fn decode(raw: &str) -> CoreResult<Cart> {
    let record: PersistedCart = serde_json::from_str(raw)?;
    record.into_cart()
}

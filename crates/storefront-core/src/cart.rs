//! # Cart
//!
//! The pure cart state machine. Every mutation the store performs goes
//! through one of the methods below.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Transitions                               │
//! │                                                                         │
//! │  Operation            Key present?        Effect                        │
//! │  ─────────            ────────────        ──────                        │
//! │                                                                         │
//! │  add_item(item)       invalid item ─────► ignored                       │
//! │                       yes ──────────────► qty += item.qty, refresh      │
//! │                       no  ──────────────► push (insertion order kept)   │
//! │                                                                         │
//! │  update_quantity(k,n) yes, n > 0 ───────► qty = n                       │
//! │                       yes, n ≤ 0 ───────► remove                        │
//! │                       no  ──────────────► no-op                         │
//! │                                                                         │
//! │  remove_item(k)       yes ──────────────► remove                        │
//! │                       no  ──────────────► no-op                         │
//! │                                                                         │
//! │  clear()              ─────────────────► items = []                     │
//! │                                                                         │
//! │  Every method returns `true` iff the cart changed.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by [`LineItemKey`]
//! - Every item passes [`validate_line_item`], so quantities stay in
//!   `1..=MAX_QUANTITY` and the persisted record always decodes again
//! - Totals are computed from `items` on every read, never cached

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LineItem, LineItemKey};
use crate::validation::{validate_line_item, MAX_QUANTITY};

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a line item, merging with an existing item of the same key.
    ///
    /// ## Behavior
    /// - Item fails [`validate_line_item`] (quantity ≤ 0 or above
    ///   [`MAX_QUANTITY`], blank name or variant, negative price): ignored
    /// - Key already in cart: quantities are summed, clamped to
    ///   [`MAX_QUANTITY`], and `name`, `price`, `image` are refreshed from
    ///   the incoming snapshot
    /// - Key not in cart: appended at the end
    ///
    /// No stock check happens here. Callers clamp against stock before
    /// calling (see [`crate::QuantitySelector`]).
    pub fn add_item(&mut self, item: LineItem) -> bool {
        if validate_line_item(&item).is_err() {
            return false;
        }

        let key = item.key();
        if let Some(existing) = self.find_mut(&key) {
            let quantity = existing.quantity.saturating_add(item.quantity).min(MAX_QUANTITY);
            let changed = existing.quantity != quantity
                || existing.name != item.name
                || existing.price != item.price
                || existing.image != item.image;

            existing.quantity = quantity;
            existing.name = item.name;
            existing.price = item.price;
            existing.image = item.image;
            return changed;
        }

        self.items.push(item);
        true
    }

    /// Sets the quantity of an item in the cart.
    ///
    /// ## Behavior
    /// - Quantity ≤ 0: removes the item
    /// - Quantity above [`MAX_QUANTITY`]: clamped
    /// - Key not found: no-op
    pub fn update_quantity(&mut self, key: &LineItemKey, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(key);
        }
        let quantity = quantity.min(MAX_QUANTITY);

        match self.find_mut(key) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Removes an item from the cart by key. Absent keys are a no-op.
    pub fn remove_item(&mut self, key: &LineItemKey) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| !i.matches(key));
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }

    /// Returns the item with the given key, if present.
    pub fn get(&self, key: &LineItemKey) -> Option<&LineItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    /// Items in first-insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ quantity over all items. Saturates rather than overflowing.
    pub fn total_items(&self) -> i64 {
        self.items.iter().fold(0, |total, i| total.saturating_add(i.quantity))
    }

    /// Σ price × quantity over all items.
    ///
    /// Exact for any cart whose subtotal fits in `i64` cents; beyond that
    /// it saturates at `i64::MAX` cents (see [`Money`]'s arithmetic).
    pub fn total_price(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    fn find_mut(&mut self, key: &LineItemKey) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.matches(key))
    }
}

/// Builds a cart by adding each item in order, so duplicate keys merge.
impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for item in iter {
            cart.add_item(item);
        }
        cart
    }
}

/// Cart totals summary for the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Distinct line items.
    pub line_count: usize,
    pub total_items: i64,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.len(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductId, Size};
    use std::collections::HashSet;

    fn item(id: u64, size: impl Into<Size>, color: &str, price_cents: i64, qty: i64) -> LineItem {
        LineItem::new(
            ProductId::new(id),
            format!("Product {}", id),
            Money::from_cents(price_cents),
            size,
            color,
            qty,
        )
    }

    fn key(id: u64, size: impl Into<Size>, color: &str) -> LineItemKey {
        LineItemKey::new(ProductId::new(id), size, color)
    }

    fn assert_consistent(cart: &Cart) {
        let keys: HashSet<LineItemKey> = cart.items().iter().map(LineItem::key).collect();
        assert_eq!(keys.len(), cart.len(), "duplicate identity keys");
        assert!(cart.items().iter().all(|i| i.quantity >= 1));

        let expected_items: i64 = cart.items().iter().map(|i| i.quantity).sum();
        let expected_price: i64 = cart
            .items()
            .iter()
            .map(|i| i.price.cents() * i.quantity)
            .sum();
        assert_eq!(cart.total_items(), expected_items);
        assert_eq!(cart.total_price().cents(), expected_price);
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();

        assert!(cart.add_item(item(1, 9u32, "red", 999, 2)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price().cents(), 1998);
    }

    #[test]
    fn test_repeated_adds_accumulate_into_one_item() {
        let mut cart = Cart::new();

        for _ in 0..7 {
            cart.add_item(item(1, 9u32, "red", 3990, 1));
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 7);
        assert_consistent(&cart);
    }

    #[test]
    fn test_numeric_and_string_sizes_merge() {
        let mut cart = Cart::new();

        cart.add_item(item(1, 9u32, "red", 3990, 1));
        cart.add_item(item(1, "9", "red", 3990, 1));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_distinct_variants_stay_separate_in_insertion_order() {
        let mut cart = Cart::new();

        cart.add_item(item(2, "M", "blue", 2500, 1));
        cart.add_item(item(1, 9u32, "red", 3990, 1));
        cart.add_item(item(1, 10u32, "red", 3990, 1));
        cart.add_item(item(1, 9u32, "white", 3990, 1));
        cart.add_item(item(2, "M", "blue", 2500, 3));

        let keys: Vec<LineItemKey> = cart.items().iter().map(LineItem::key).collect();
        assert_eq!(
            keys,
            vec![
                key(2, "M", "blue"),
                key(1, "9", "red"),
                key(1, "10", "red"),
                key(1, "9", "white"),
            ]
        );
        assert_eq!(cart.get(&key(2, "M", "blue")).map(|i| i.quantity), Some(4));
        assert_consistent(&cart);
    }

    #[test]
    fn test_add_refreshes_snapshot_fields() {
        let mut cart = Cart::new();

        cart.add_item(item(1, 9u32, "red", 3990, 1).with_image("/old.png"));
        let mut repriced = item(1, 9u32, "red", 2990, 2).with_image("/new.png");
        repriced.name = "Trail Runner v2".to_string();
        cart.add_item(repriced);

        let merged = &cart.items()[0];
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.price.cents(), 2990);
        assert_eq!(merged.name, "Trail Runner v2");
        assert_eq!(merged.image, "/new.png");
        assert_eq!(cart.total_price().cents(), 8970);
    }

    #[test]
    fn test_add_ignores_non_positive_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", 100, 2));

        assert!(!cart.add_item(item(1, 9u32, "red", 100, 0)));
        assert!(!cart.add_item(item(1, 9u32, "red", 100, -5)));
        assert!(!cart.add_item(item(3, 9u32, "red", 100, 0)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_merge_clamps_to_max_quantity() {
        let mut cart = Cart::new();
        assert!(cart.add_item(item(1, 9u32, "red", 19999, MAX_QUANTITY - 1)));
        assert!(cart.add_item(item(1, 9u32, "red", 19999, 5)));

        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);

        // Already at the cap with an identical snapshot: nothing changes.
        assert!(!cart.add_item(item(1, 9u32, "red", 19999, 1)));
        assert_eq!(cart.total_price().cents(), 19999 * MAX_QUANTITY);
    }

    #[test]
    fn test_add_rejects_items_that_would_not_reload() {
        let mut cart = Cart::new();

        assert!(!cart.add_item(item(1, 9u32, "red", 100, i64::MAX / 2)));
        assert!(!cart.add_item(item(1, 9u32, "red", -1, 1)));
        assert!(!cart.add_item(item(1, "  ", "red", 100, 1)));
        assert!(!cart.add_item(item(1, 9u32, "", 100, 1)));

        let mut blank = item(1, 9u32, "red", 100, 1);
        blank.name = "   ".to_string();
        assert!(!cart.add_item(blank));

        let mut long = item(1, 9u32, "red", 100, 1);
        long.name = "A".repeat(201);
        assert!(!cart.add_item(long));

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_clamps_to_max_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", 100, 1));

        assert!(cart.update_quantity(&key(1, 9u32, "red"), i64::MAX));
        assert_eq!(cart.total_items(), MAX_QUANTITY);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", i64::MAX / 2, MAX_QUANTITY));
        cart.add_item(item(2, "M", "blue", i64::MAX, 2));

        assert_eq!(cart.total_price(), Money::from_cents(i64::MAX));
        assert_eq!(cart.total_items(), MAX_QUANTITY + 2);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", 500, 1));

        assert!(cart.update_quantity(&key(1, 9u32, "red"), 4));
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price().cents(), 2000);

        // Same value is not a change
        assert!(!cart.update_quantity(&key(1, "9", "red"), 4));
    }

    #[test]
    fn test_non_positive_update_removes() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", 500, 3));
        cart.add_item(item(2, "M", "blue", 700, 1));

        assert!(cart.update_quantity(&key(1, 9u32, "red"), 0));
        assert!(cart.get(&key(1, 9u32, "red")).is_none());

        assert!(cart.update_quantity(&key(2, "M", "blue"), -3));
        assert!(cart.get(&key(2, "M", "blue")).is_none());

        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_update_missing_key_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", 500, 1));

        assert!(!cart.update_quantity(&key(1, 9u32, "blue"), 5));
        assert!(!cart.update_quantity(&key(42, 9u32, "red"), -1));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", 500, 1));
        cart.add_item(item(1, 10u32, "red", 500, 1));

        assert!(cart.remove_item(&key(1, "9", "red")));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].selected_size.as_str(), "10");
    }

    #[test]
    fn test_remove_from_empty_cart_is_noop() {
        let mut cart = Cart::new();

        assert!(!cart.remove_item(&key(999, "9", "red")));
        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        assert!(!cart.clear());

        cart.add_item(item(1, 9u32, "red", 999, 2));
        assert!(cart.clear());
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_mixed_sequence_keeps_invariants() {
        let mut cart = Cart::new();
        let ops: Vec<Box<dyn Fn(&mut Cart)>> = vec![
            Box::new(|c| {
                c.add_item(item(1, 9u32, "red", 3990, 2));
            }),
            Box::new(|c| {
                c.add_item(item(2, "M", "blue", 1250, 1));
            }),
            Box::new(|c| {
                c.add_item(item(1, "9", "red", 3990, 1));
            }),
            Box::new(|c| {
                c.update_quantity(&key(2, "M", "blue"), 5);
            }),
            Box::new(|c| {
                c.remove_item(&key(3, "L", "black"));
            }),
            Box::new(|c| {
                c.add_item(item(3, "L", "black", 4500, 2));
            }),
            Box::new(|c| {
                c.update_quantity(&key(1, 9.0, "red"), 0);
            }),
            Box::new(|c| {
                c.add_item(item(1, 9u32, "red", 3990, 1));
            }),
        ];

        for op in &ops {
            op(&mut cart);
            assert_consistent(&cart);
        }

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_items(), 8);
        assert_eq!(cart.total_price().cents(), 1250 * 5 + 4500 * 2 + 3990);
    }

    #[test]
    fn test_from_iterator_merges_duplicates() {
        let cart: Cart = vec![
            item(1, 9u32, "red", 100, 1),
            item(1, "9", "red", 100, 2),
            item(2, "S", "red", 100, 1),
        ]
        .into_iter()
        .collect();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 9u32, "red", 3990, 2));
        cart.add_item(item(2, "M", "blue", 1500, 1));

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.total_price.cents(), 9480);
    }
}

//! # Cart Commands
//!
//! The operations a view layer invokes on the cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐                    │
//! │  │  Empty   │────►│ In Cart  │────►│  Reopened    │                    │
//! │  │  Cart    │     │          │     │  (rehydrated)│                    │
//! │  └──────────┘     └──────────┘     └──────────────┘                    │
//! │                        │                                                │
//! │                   add_to_cart                                           │
//! │                   update_cart_item                                      │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────► (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartStore, Catalog};
use storefront_core::validation::{validate_line_item, validate_variant};
use storefront_core::{
    Cart, CartTotals, CatalogProduct, LineItem, LineItemKey, ProductId, QuantitySelector, Size,
};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

fn snapshot(store: &CartStore) -> CartResponse {
    store.with_cart(|cart| CartResponse::from(cart))
}

/// A request to add a product, as a product card or detail panel sends it.
///
/// Missing size or color means "use the product's first option", which is
/// what a product card preselects.
#[derive(Debug, Clone, PartialEq)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub size: Option<Size>,
    pub color: Option<String>,
    pub quantity: Option<i64>,
}

impl AddToCartRequest {
    /// One unit of the product's default variant.
    pub fn new(product_id: ProductId) -> Self {
        AddToCartRequest {
            product_id,
            size: None,
            color: None,
            quantity: None,
        }
    }
}

/// Looks a product up in the catalog.
pub(crate) fn find_product(catalog: &Catalog, product_id: ProductId) -> Result<&CatalogProduct, ApiError> {
    catalog
        .get(product_id)
        .ok_or_else(|| ApiError::not_found("Product", &product_id.to_string()))
}

/// Resolves a requested size and color against the product's options.
///
/// A missing value falls back to the product's first option. Blank values
/// are refused, as are options the product does not list.
pub(crate) fn resolve_variant(
    product: &CatalogProduct,
    size: Option<Size>,
    color: Option<String>,
) -> Result<(Size, String), ApiError> {
    let size = match size {
        Some(size) => size,
        None => product
            .sizes
            .first()
            .cloned()
            .ok_or_else(|| ApiError::validation(format!("{} has no sizes; pass one explicitly", product.name)))?,
    };

    let color = match color {
        Some(color) => color.trim().to_string(),
        None => product
            .colors
            .first()
            .cloned()
            .ok_or_else(|| ApiError::validation(format!("{} has no colors; pass one explicitly", product.name)))?,
    };

    validate_variant(&size, &color)?;

    if !product.sizes.is_empty() && !product.sizes.contains(&size) {
        return Err(ApiError::validation(format!(
            "Size {} is not available for {}",
            size, product.name
        )));
    }
    if !product.colors.is_empty() && !product.colors.contains(&color) {
        return Err(ApiError::validation(format!(
            "Color {} is not available for {}",
            color, product.name
        )));
    }

    Ok((size, color))
}

/// Gets the current cart contents.
pub fn get_cart(store: &CartStore) -> CartResponse {
    debug!("get_cart command");
    snapshot(store)
}

/// Adds a product to the cart.
///
/// ## Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Look the product up in the catalog                                 │
/// │  2. Refuse if out of stock                                             │
/// │  3. Resolve size/color (default: first option), refuse blank/unknown   │
/// │  4. Clamp quantity to 1..=stock (QuantitySelector)                     │
/// │  5. Snapshot name/price/image into a LineItem and validate it          │
/// │  6. store.add_to_cart(item) → merges with an identical variant         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn add_to_cart(
    store: &CartStore,
    catalog: &Catalog,
    request: AddToCartRequest,
) -> Result<CartResponse, ApiError> {
    debug!(
        product_id = %request.product_id,
        size = ?request.size,
        color = ?request.color,
        quantity = ?request.quantity,
        "add_to_cart command"
    );

    let product = find_product(catalog, request.product_id)?;

    let mut selector = QuantitySelector::for_product(product);
    if selector.is_out_of_stock() {
        return Err(ApiError::out_of_stock(&product.name));
    }

    let (size, color) = resolve_variant(product, request.size, request.color)?;
    let quantity = selector.request(request.quantity.unwrap_or(1));

    let item = LineItem::from_product(product, size, color, quantity);
    validate_line_item(&item)?;

    store.add_to_cart(item);
    Ok(snapshot(store))
}

/// Updates the quantity of an item in the cart.
///
/// ## Behavior
/// - Quantity ≤ 0: removes the item
/// - Item not in cart: `NotFound`
pub fn update_cart_item(
    store: &CartStore,
    key: &LineItemKey,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(item = %key, quantity, "update_cart_item command");

    if store.get(key).is_none() {
        return Err(ApiError::not_found("Cart item", &key.to_string()));
    }

    store.update_line(key, quantity);
    Ok(snapshot(store))
}

/// Removes an item from the cart.
pub fn remove_from_cart(store: &CartStore, key: &LineItemKey) -> Result<CartResponse, ApiError> {
    debug!(item = %key, "remove_from_cart command");

    if !store.remove_line(key) {
        return Err(ApiError::not_found("Cart item", &key.to_string()));
    }

    Ok(snapshot(store))
}

/// Clears all items from the cart.
pub fn clear_cart(store: &CartStore) -> CartResponse {
    debug!("clear_cart command");

    store.clear_cart();
    snapshot(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::MemoryStorage;
    use storefront_core::Money;

    async fn setup() -> (CartStore, Catalog) {
        let store = CartStore::open(MemoryStorage::new(), "cart").await;
        (store, Catalog::bundled().unwrap())
    }

    fn request(id: u64, size: &str, color: &str, quantity: i64) -> AddToCartRequest {
        AddToCartRequest {
            product_id: ProductId::new(id),
            size: Some(Size::from(size)),
            color: Some(color.to_string()),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_add_snapshots_product() {
        let (store, catalog) = setup().await;

        let response = add_to_cart(&store, &catalog, request(1, "9", "black", 2)).unwrap();

        assert_eq!(response.items.len(), 1);
        let item = &response.items[0];
        assert_eq!(item.name, "Jordan 1 Retro High OG");
        assert_eq!(item.price, Money::from_cents(19999));
        assert_eq!(item.image, "/products/Jordan-black.png");
        assert_eq!(response.totals.total_items, 2);
        assert_eq!(response.totals.total_price, Money::from_cents(39998));
    }

    #[tokio::test]
    async fn test_add_uses_default_variant() {
        let (store, catalog) = setup().await;

        let response = add_to_cart(&store, &catalog, AddToCartRequest::new(ProductId::new(2))).unwrap();

        let item = &response.items[0];
        assert_eq!(item.selected_size, Size::from("6"));
        assert_eq!(item.selected_color, "white");
        assert_eq!(item.quantity, 1);
    }

    #[tokio::test]
    async fn test_add_same_variant_merges() {
        let (store, catalog) = setup().await;

        add_to_cart(&store, &catalog, request(4, "9", "green", 1)).unwrap();

        let mut numeric = request(4, "", "green", 1);
        numeric.size = Some(Size::from(9.0f64));
        let response = add_to_cart(&store, &catalog, numeric).unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.totals.total_items, 2);
    }

    #[tokio::test]
    async fn test_add_clamps_to_stock() {
        let (store, catalog) = setup().await;

        // Air Force 1 has 5 in stock.
        let response = add_to_cart(&store, &catalog, request(2, "8", "gray", 40)).unwrap();
        assert_eq!(response.totals.total_items, 5);

        let response = add_to_cart(&store, &catalog, request(2, "8", "gray", -2)).unwrap();
        assert_eq!(response.totals.total_items, 6);
    }

    #[tokio::test]
    async fn test_add_out_of_stock_refused() {
        let (store, catalog) = setup().await;

        let err = add_to_cart(&store, &catalog, request(3, "8", "gray", 1)).unwrap_err();

        assert_eq!(err.code, ErrorCode::OutOfStock);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_product_or_variant() {
        let (store, catalog) = setup().await;

        let err = add_to_cart(&store, &catalog, request(999, "9", "red", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = add_to_cart(&store, &catalog, request(1, "15", "red", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_to_cart(&store, &catalog, request(1, "9", "purple", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_blank_variant_refused_when_product_lists_none() {
        let store = CartStore::open(MemoryStorage::new(), "cart").await;
        let catalog = Catalog::from_json(
            r#"[{"id":40,"name":"Gift Card","price":2500,"stock":100,"sizes":["One Size"]},
                {"id":41,"name":"Sticker Pack","price":500,"stock":100,"colors":["mixed"]}]"#,
        )
        .unwrap();

        let mut blank_color = AddToCartRequest::new(ProductId::new(40));
        blank_color.color = Some("   ".to_string());
        let err = add_to_cart(&store, &catalog, blank_color).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "selectedColor is required");

        let mut blank_size = AddToCartRequest::new(ProductId::new(41));
        blank_size.size = Some(Size::from(""));
        let err = add_to_cart(&store, &catalog, blank_size).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_to_cart(&store, &catalog, AddToCartRequest::new(ProductId::new(40))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut explicit = AddToCartRequest::new(ProductId::new(40));
        explicit.color = Some("digital".to_string());
        let response = add_to_cart(&store, &catalog, explicit).unwrap();
        assert_eq!(response.items[0].selected_color, "digital");
        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_product_with_blank_name_is_refused() {
        let store = CartStore::open(MemoryStorage::new(), "cart").await;
        let catalog = Catalog::from_json(
            r#"[{"id":50,"name":"  ","price":100,"stock":3,"sizes":["S"],"colors":["red"]}]"#,
        )
        .unwrap();

        let err = add_to_cart(&store, &catalog, AddToCartRequest::new(ProductId::new(50))).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let (store, catalog) = setup().await;
        add_to_cart(&store, &catalog, request(1, "9", "red", 1)).unwrap();
        let key = LineItemKey::new(ProductId::new(1), 9u32, "red");

        let response = update_cart_item(&store, &key, 3).unwrap();
        assert_eq!(response.totals.total_items, 3);

        let response = remove_from_cart(&store, &key).unwrap();
        assert!(response.items.is_empty());

        let err = remove_from_cart(&store, &key).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_cart_item(&store, &key, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let (store, catalog) = setup().await;
        add_to_cart(&store, &catalog, request(1, "9", "red", 2)).unwrap();
        let key = LineItemKey::new(ProductId::new(1), "9", "red");

        let response = update_cart_item(&store, &key, 0).unwrap();
        assert!(response.items.is_empty());
    }

    #[tokio::test]
    async fn test_clear_and_get() {
        let (store, catalog) = setup().await;
        add_to_cart(&store, &catalog, request(1, "9", "red", 2)).unwrap();
        add_to_cart(&store, &catalog, request(8, "10", "blue", 1)).unwrap();

        assert_eq!(get_cart(&store).totals.line_count, 2);

        let response = clear_cart(&store);
        assert!(response.items.is_empty());
        assert_eq!(response.totals.total_price, Money::zero());
    }
}

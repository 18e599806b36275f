//! Client-side cart.
//!
//! The cart is a pure, synchronous collection of product snapshots with
//! quantities. It never talks to the network and never rejects input:
//! malformed updates are no-ops.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// A product snapshot plus the quantity the shopper intends to buy.
///
/// The snapshot is taken by value when the product is first added, so later
/// catalog refreshes do not change what is in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product snapshot at the time it was added.
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Identifier of the product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Ordered collection of cart lines, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from persisted lines, merging duplicates and dropping
    /// zero quantities so the one-line-per-product invariant holds.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(item.product_id()) {
                Some(idx) => {
                    if let Some(existing) = cart.items.get_mut(idx) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of `product`, merging with an existing line if present.
    ///
    /// No stock check happens here.
    pub fn add(&mut self, product: Product) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Set the quantity of a line. Anything below 1 removes the line.
    ///
    /// Unknown products and quantities that do not fit in a `u32` are ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity < 1 {
            self.remove(product_id);
            return;
        }
        let Ok(quantity) = u32::try_from(quantity) else {
            return;
        };
        if let Some(item) = self.items.iter_mut().find(|i| &i.product.id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Remove a line. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|i| &i.product.id != product_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Consume the cart, returning its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product.id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn product(id: &str, price: i64) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Decimal::from(price),
            category: "Test".to_string(),
            stock: 10,
            images: vec![format!("/{id}.jpg")],
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add(product("p1", 100));
        }

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 5);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(product("b", 1));
        cart.add(product("a", 1));
        cart.add(product("b", 1));

        let ids: Vec<_> = cart.items().iter().map(|i| i.product_id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut with_update = Cart::new();
        with_update.add(product("p1", 5));
        with_update.add(product("p2", 5));
        let mut with_remove = with_update.clone();

        with_update.update_quantity(&ProductId::new("p1"), 0);
        with_remove.remove(&ProductId::new("p1"));

        assert_eq!(with_update, with_remove);
        assert!(with_update.get(&ProductId::new("p1")).is_none());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = Cart::new();
        cart.add(product("p1", 5));
        cart.update_quantity(&ProductId::new("p1"), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_replaces_value() {
        let mut cart = Cart::new();
        cart.add(product("p1", 5));
        cart.update_quantity(&ProductId::new("p1"), 9);
        assert_eq!(cart.item_count(), 9);
    }

    #[test]
    fn test_update_quantity_ignores_unknown_and_oversized() {
        let mut cart = Cart::new();
        cart.add(product("p1", 5));
        let before = cart.clone();

        cart.update_quantity(&ProductId::new("missing"), 4);
        cart.update_quantity(&ProductId::new("p1"), i64::from(u32::MAX) + 1);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("p1", 5));
        let before = cart.clone();

        cart.remove(&ProductId::new("nope"));

        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(product("p1", 5));
        cart.clear();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        cart.add(product("p1", 100));
        cart.add(product("p1", 100));
        cart.add(product("p1", 100));
        cart.add(product("p2", 20));

        assert_eq!(cart.subtotal(), Decimal::from(320));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_from_items_restores_invariant() {
        let items = vec![
            CartItem {
                product: product("p1", 1),
                quantity: 2,
            },
            CartItem {
                product: product("p2", 1),
                quantity: 0,
            },
            CartItem {
                product: product("p1", 1),
                quantity: 3,
            },
        ];

        let cart = Cart::from_items(items);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_cart_item_wire_shape_is_flat() {
        let mut cart = Cart::new();
        cart.add(product("p1", 3));

        let value = serde_json::to_value(&cart).unwrap();
        let line = &value[0];
        assert_eq!(line["_id"], "p1");
        assert_eq!(line["quantity"], 1);

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}

//! Cart slice. Local mutations only.

use rust_decimal::Decimal;
use tracing::debug;

use estore_core::{Cart, CartItem, PriceBreakdown, Product, ProductId};

/// The user's cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    cart: Cart,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from persisted lines.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self {
            cart: Cart::from_items(items),
        }
    }

    pub fn add_to_cart(&mut self, product: Product) {
        debug!(product_id = %product.id, "Adding to cart");
        self.cart.add(product);
    }

    /// Set a line's quantity. Anything below 1 removes the line.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        debug!(product_id = %product_id, quantity, "Updating cart quantity");
        self.cart.update_quantity(product_id, quantity);
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        debug!(product_id = %product_id, "Removing from cart");
        self.cart.remove(product_id);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    #[must_use]
    pub fn price_breakdown(&self) -> PriceBreakdown {
        PriceBreakdown::for_items(self.cart.items())
    }
}

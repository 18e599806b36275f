//! Order slice.

use tracing::{info, instrument, warn};

use estore_core::{NewOrder, Order, OrderId};

use super::cart::CartStore;
use crate::api::StorefrontApi;

/// The user's orders plus loading and error flags.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    my_orders: Vec<Order>,
    selected_order: Option<Order>,
    order_loading: bool,
    order_error: Option<String>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn my_orders(&self) -> &[Order] {
        &self.my_orders
    }

    #[must_use]
    pub const fn selected_order(&self) -> Option<&Order> {
        self.selected_order.as_ref()
    }

    #[must_use]
    pub const fn order_loading(&self) -> bool {
        self.order_loading
    }

    #[must_use]
    pub fn order_error(&self) -> Option<&str> {
        self.order_error.as_deref()
    }

    fn begin(&mut self) {
        self.order_loading = true;
        self.order_error = None;
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Order request failed");
        self.order_error = Some(message);
        self.order_loading = false;
    }

    /// Place an order and clear the cart.
    ///
    /// Returns `None` if the backend rejected the order; the cart is then
    /// left exactly as it was.
    pub async fn create_order<A: StorefrontApi>(
        &mut self,
        api: &A,
        cart: &mut CartStore,
        order: &NewOrder,
    ) -> Option<Order> {
        let created = self.create_preliminary_order(api, order).await?;
        cart.clear_cart();
        Some(created)
    }

    /// Place an order without touching the cart.
    ///
    /// Checkout uses this for the unpaid order the payment is verified
    /// against; the cart is only cleared once that payment is confirmed.
    #[instrument(skip(self, api, order), fields(items = order.order_items.len(), is_paid = order.is_paid))]
    pub async fn create_preliminary_order<A: StorefrontApi>(
        &mut self,
        api: &A,
        order: &NewOrder,
    ) -> Option<Order> {
        self.begin();
        match api.create_order(order).await {
            Ok(created) => {
                info!(order_id = %created.id, "Order created");
                self.order_loading = false;
                Some(created)
            }
            Err(e) => {
                self.fail(e.message_or("Failed to create order"));
                None
            }
        }
    }

    /// Replace the order list with the backend's.
    #[instrument(skip(self, api))]
    pub async fn fetch_my_orders<A: StorefrontApi>(&mut self, api: &A) {
        self.begin();
        match api.my_orders().await {
            Ok(orders) => {
                self.my_orders = orders;
                self.order_loading = false;
            }
            Err(e) => self.fail(e.message_or("Failed to fetch orders")),
        }
    }

    #[instrument(skip(self, api), fields(order_id = %id))]
    pub async fn fetch_order_by_id<A: StorefrontApi>(&mut self, api: &A, id: &OrderId) {
        self.begin();
        match api.get_order(id).await {
            Ok(order) => {
                self.selected_order = Some(order);
                self.order_loading = false;
            }
            Err(e) => self.fail(e.message_or("Failed to fetch order")),
        }
    }
}

//! Order types.
//!
//! An order is the backend's record of what was actually purchased. The
//! client only ever holds a read-only projection; the paid flag flips
//! server-side when a payment is verified.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::id::{OrderId, ProductId, UserId};
use super::price::PriceBreakdown;

/// A purchased line, denormalized from the cart at order-creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Primary image at the time of purchase.
    pub image: String,
    /// Unit price at the time of purchase.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// The product this line was bought from.
    pub product: ProductId,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.product.name.clone(),
            quantity: item.quantity,
            image: item.product.primary_image().to_string(),
            price: item.product.price,
            product: item.product.id.clone(),
        }
    }
}

/// Errors validating a shipping address.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingAddressError {
    #[error("address is required")]
    MissingAddress,
    #[error("city is required")]
    MissingCity,
    #[error("postal code is required")]
    MissingPostalCode,
}

/// Where an order ships to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// Check that every field is non-blank.
    ///
    /// # Errors
    ///
    /// Returns the first blank field, in form order.
    pub fn validate(&self) -> Result<(), ShippingAddressError> {
        if self.address.trim().is_empty() {
            return Err(ShippingAddressError::MissingAddress);
        }
        if self.city.trim().is_empty() {
            return Err(ShippingAddressError::MissingCity);
        }
        if self.postal_code.trim().is_empty() {
            return Err(ShippingAddressError::MissingPostalCode);
        }
        Ok(())
    }
}

/// Gateway transaction details recorded on a paid order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// External transaction id.
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub email_address: String,
}

/// The user an order belongs to, as populated by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub user: OrderUser,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    #[serde(flatten)]
    pub pricing: PriceBreakdown,
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    #[serde(flatten)]
    pub pricing: PriceBreakdown,
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl NewOrder {
    /// Build an unpaid order from cart lines.
    ///
    /// Each line is reshaped into an [`OrderItem`] and the breakdown is
    /// computed from the same lines.
    #[must_use]
    pub fn unpaid(
        items: &[CartItem],
        shipping_address: ShippingAddress,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            order_items: items.iter().map(OrderItem::from).collect(),
            shipping_address,
            payment_method: payment_method.into(),
            payment_result: None,
            pricing: PriceBreakdown::for_items(items),
            is_paid: false,
            paid_at: None,
        }
    }
}

//! Order pricing using decimal arithmetic.
//!
//! The store charges a flat tax percentage and free shipping; there is no
//! multi-currency or tax-jurisdiction logic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartItem;

/// Flat tax rate applied to the items subtotal, in percent.
pub const TAX_RATE_PERCENT: u32 = 8;

/// ISO 4217 code of the only currency the payment gateway is asked to charge.
pub const CURRENCY_CODE: &str = "INR";

/// Itemized price of an order.
///
/// Each component is stored, not derived, so an order can be displayed
/// exactly as it was charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub items_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl PriceBreakdown {
    /// Price a set of cart lines.
    #[must_use]
    pub fn for_items(items: &[CartItem]) -> Self {
        let items_price: Decimal = items.iter().map(CartItem::line_total).sum();
        Self::from_subtotal(items_price)
    }

    /// Apply tax and shipping to an items subtotal.
    #[must_use]
    pub fn from_subtotal(items_price: Decimal) -> Self {
        let tax_price = items_price * tax_rate();
        let shipping_price = Decimal::ZERO;
        Self {
            items_price,
            tax_price,
            shipping_price,
            total_price: items_price + shipping_price + tax_price,
        }
    }

    /// Format an amount for display (e.g., "₹324.00").
    #[must_use]
    pub fn display(amount: Decimal) -> String {
        format!("₹{:.2}", amount.round_dp(2))
    }
}

fn tax_rate() -> Decimal {
    Decimal::new(i64::from(TAX_RATE_PERCENT), 2)
}

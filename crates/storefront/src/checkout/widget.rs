//! Payment widget seam.
//!
//! The hosted widget reports back through callbacks. Here those callbacks
//! become [`WidgetEvent`] messages sent on the channel handed to
//! [`PaymentWidget::open`]; checkout awaits the first one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Merchant name shown in the widget.
pub const MERCHANT_NAME: &str = "E-Store";
/// Transaction description shown in the widget.
pub const TRANSACTION_DESCRIPTION: &str = "E-Commerce Transaction";
/// Widget accent colour.
pub const THEME_COLOR: &str = "#0070f3";

/// Options the widget is opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetOptions {
    /// Publishable gateway key id.
    pub key: String,
    /// Amount as returned by the gateway order.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub name: String,
    pub description: String,
    /// Gateway order id the payment is bound to.
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// What the widget hands back after a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentResponse {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

/// Outcome reported by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Succeeded(PaymentResponse),
    /// The gateway declined the payment.
    Failed { description: String },
    /// The user closed the widget without paying.
    Dismissed,
}

/// The widget could not be opened.
#[derive(Debug, Clone, Error)]
#[error("payment widget failed to open: {0}")]
pub struct WidgetError(pub String);

/// A third-party checkout widget.
pub trait PaymentWidget {
    /// Open the widget.
    ///
    /// Returns once the widget is showing. Exactly one event is expected on
    /// `events`; dropping the sender without sending counts as dismissal.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget cannot be shown at all.
    fn open(
        &mut self,
        options: WidgetOptions,
        events: UnboundedSender<WidgetEvent>,
    ) -> Result<(), WidgetError>;
}

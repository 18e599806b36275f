//! Checkout coordination.
//!
//! One call to [`CheckoutFlow::pay`] is one checkout attempt:
//!
//! ```text
//! Idle -> Validating -> CreatingPreliminaryOrder -> InitializingPaymentGateway
//!      -> AwaitingUserPayment -> VerifyingPayment -> Succeeded
//! ```
//!
//! Any failure records an alert and returns the flow to `Idle`. The unpaid
//! order created along the way stays on the backend.
//!
//! Ordering constraints:
//! - the widget is only opened once the backend has returned the
//!   preliminary order;
//! - the cart is only cleared after the backend verified the payment;
//! - an attempt creates at most one preliminary order.
//!
//! Cashfree runs on a hosted page that sends the user back to the storefront
//! instead of reporting through a widget. [`CheckoutFlow::complete_cashfree_return`]
//! and [`CheckoutFlow::cashfree_failure`] handle those two return pages.

mod payment_methods;
mod widget;

pub use payment_methods::{PaymentMethod, PaymentOption, available_methods};
pub use widget::{
    MERCHANT_NAME, PaymentResponse, PaymentWidget, Prefill, THEME_COLOR,
    TRANSACTION_DESCRIPTION, Theme, WidgetError, WidgetEvent, WidgetOptions,
};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use estore_core::{
    CURRENCY_CODE, NewOrder, Order, OrderId, ShippingAddress, ShippingAddressError,
};

use crate::api::{
    ApiError, CashfreeVerification, GatewayOrderRequest, PaymentVerification, StorefrontApi,
};
use crate::config::PaymentConfig;
use crate::stores::AppStore;

const GENERIC_FAILURE: &str = "An error occurred. Please try again.";
const VERIFICATION_FAILURE: &str = "Payment verification failed. Please try again.";
const PAYMENT_FAILURE: &str = "Payment failed. Please try again.";

/// Where the flow is within one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Validating,
    CreatingPreliminaryOrder,
    InitializingPaymentGateway,
    AwaitingUserPayment,
    VerifyingPayment,
    Succeeded { order_id: OrderId },
}

impl CheckoutPhase {
    /// Whether a progress indicator should be showing.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle | Self::Succeeded { .. })
    }
}

/// The checkout form as submitted.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub shipping: ShippingAddress,
    pub method: PaymentMethod,
}

/// A completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// The order as created before payment.
    pub order: Order,
    /// Confirmation page to navigate to.
    pub redirect: String,
}

/// Why an attempt ended without a verified payment.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("not signed in")]
    NotSignedIn,

    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid shipping address: {0}")]
    Validation(#[from] ShippingAddressError),

    #[error("payment method {0} is not available")]
    MethodUnavailable(PaymentMethod),

    /// Message from the order slice.
    #[error("order creation failed: {0}")]
    OrderCreation(String),

    #[error("payment gateway error: {0}")]
    Gateway(#[source] ApiError),

    #[error(transparent)]
    Widget(#[from] WidgetError),

    #[error("payment failed: {description}")]
    PaymentFailed { description: String },

    #[error("payment cancelled")]
    Dismissed,

    #[error("payment verification failed: {0}")]
    Verification(String),
}

impl CheckoutError {
    /// Text for the blocking alert shown to the user.
    #[must_use]
    pub fn alert(&self) -> String {
        match self {
            Self::NotSignedIn => "Please sign in to continue.".to_string(),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::Validation(e) => format!("Please complete the shipping address: {e}."),
            Self::MethodUnavailable(method) => format!("{method} is not available."),
            Self::OrderCreation(message) => message.clone(),
            Self::PaymentFailed { description } => description.clone(),
            Self::Dismissed => "Payment cancelled.".to_string(),
            Self::Verification(_) => VERIFICATION_FAILURE.to_string(),
            Self::Gateway(_) | Self::Widget(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Why a hosted payment page sent the user back to checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnFailure {
    /// The success page arrived without an `order_id`.
    MissingOrderId,
    /// The backend rejected the payment or could not be reached.
    VerificationFailed,
    /// The gateway sent the user to the failure page.
    PaymentFailed,
    /// No Cashfree app id is configured.
    Unavailable,
}

impl ReturnFailure {
    /// Value of the `error` query parameter on `/checkout`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingOrderId => "missing_order_id",
            Self::VerificationFailed => "verification_failed",
            Self::PaymentFailed => "payment_failed",
            Self::Unavailable => "payment_unavailable",
        }
    }

    /// Checkout page to send the user back to.
    #[must_use]
    pub fn redirect(self) -> String {
        format!("/checkout?error={}", self.code())
    }

    #[must_use]
    pub fn alert(self) -> String {
        match self {
            Self::MissingOrderId => GENERIC_FAILURE.to_string(),
            Self::VerificationFailed => VERIFICATION_FAILURE.to_string(),
            Self::PaymentFailed => PAYMENT_FAILURE.to_string(),
            Self::Unavailable => format!("{} is not available.", PaymentMethod::Cashfree),
        }
    }
}

/// Confirmation page for an order.
#[must_use]
pub fn confirmation_path(order_id: &OrderId) -> String {
    format!("/order-confirmation/{order_id}")
}

/// Drives checkout attempts for one checkout page.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    payments: PaymentConfig,
    phase: CheckoutPhase,
    history: Vec<CheckoutPhase>,
    alert: Option<String>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(payments: PaymentConfig) -> Self {
        Self {
            payments,
            phase: CheckoutPhase::Idle,
            history: vec![CheckoutPhase::Idle],
            alert: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// Every phase entered so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[CheckoutPhase] {
        &self.history
    }

    /// Alert from the last failed attempt.
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    #[must_use]
    pub fn methods(&self) -> Vec<PaymentOption> {
        available_methods(&self.payments)
    }

    fn transition(&mut self, next: CheckoutPhase) {
        info!(from = ?self.phase, to = ?next, "Checkout phase");
        self.history.push(next.clone());
        self.phase = next;
    }

    /// Run one checkout attempt.
    ///
    /// # Errors
    ///
    /// Returns the reason the attempt stopped. The flow is back in
    /// [`CheckoutPhase::Idle`] and [`alert`](Self::alert) holds the message.
    #[instrument(skip_all, fields(method = %form.method))]
    pub async fn pay<A, W>(
        &mut self,
        store: &mut AppStore<A>,
        widget: &mut W,
        form: &CheckoutForm,
    ) -> Result<CheckoutOutcome, CheckoutError>
    where
        A: StorefrontApi,
        W: PaymentWidget,
    {
        self.alert = None;
        match self.attempt(store, widget, form).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(error = %e, phase = ?self.phase, "Checkout attempt failed");
                self.alert = Some(e.alert());
                self.transition(CheckoutPhase::Idle);
                Err(e)
            }
        }
    }

    async fn attempt<A, W>(
        &mut self,
        store: &mut AppStore<A>,
        widget: &mut W,
        form: &CheckoutForm,
    ) -> Result<CheckoutOutcome, CheckoutError>
    where
        A: StorefrontApi,
        W: PaymentWidget,
    {
        self.transition(CheckoutPhase::Validating);
        let user = store
            .auth()
            .user()
            .cloned()
            .ok_or(CheckoutError::NotSignedIn)?;
        if store.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        form.shipping.validate()?;
        let key = self.key_for(form.method)?;

        self.transition(CheckoutPhase::CreatingPreliminaryOrder);
        let new_order = NewOrder::unpaid(
            store.cart().items(),
            form.shipping.clone(),
            form.method.stored_name(),
        );
        let Some(order) = store.create_preliminary_order(&new_order).await else {
            let message = store
                .orders()
                .order_error()
                .unwrap_or("Failed to create order")
                .to_string();
            return Err(CheckoutError::OrderCreation(message));
        };

        self.transition(CheckoutPhase::InitializingPaymentGateway);
        let gateway_order = store
            .api()
            .create_gateway_order(&GatewayOrderRequest {
                amount: order.pricing.total_price,
            })
            .await
            .map_err(CheckoutError::Gateway)?;

        let options = WidgetOptions {
            key,
            amount: gateway_order.amount,
            currency: CURRENCY_CODE.to_string(),
            name: MERCHANT_NAME.to_string(),
            description: TRANSACTION_DESCRIPTION.to_string(),
            order_id: gateway_order.id,
            prefill: Prefill {
                name: user.name,
                email: user.email,
            },
            theme: Theme {
                color: THEME_COLOR.to_string(),
            },
        };

        self.transition(CheckoutPhase::AwaitingUserPayment);
        let (events, mut received) = mpsc::unbounded_channel();
        widget.open(options, events)?;
        let response = match received.recv().await.unwrap_or(WidgetEvent::Dismissed) {
            WidgetEvent::Succeeded(response) => response,
            WidgetEvent::Failed { description } => {
                return Err(CheckoutError::PaymentFailed { description });
            }
            WidgetEvent::Dismissed => return Err(CheckoutError::Dismissed),
        };

        self.transition(CheckoutPhase::VerifyingPayment);
        let verification = store
            .api()
            .verify_payment(&PaymentVerification {
                razorpay_payment_id: response.razorpay_payment_id,
                razorpay_order_id: response.razorpay_order_id,
                razorpay_signature: response.razorpay_signature,
                order_id: order.id.clone(),
            })
            .await
            .map_err(|e| CheckoutError::Verification(e.to_string()))?;
        if !verification.is_success() {
            return Err(CheckoutError::Verification(
                verification.message.unwrap_or(verification.status),
            ));
        }

        store.clear_cart();
        info!(order_id = %order.id, "Payment verified");
        self.transition(CheckoutPhase::Succeeded {
            order_id: order.id.clone(),
        });

        Ok(CheckoutOutcome {
            redirect: confirmation_path(&order.id),
            order,
        })
    }

    /// Handle the hosted page's success return.
    ///
    /// Verifies `order_id` with the backend, clears the cart and returns the
    /// confirmation path. The cart is left alone on any failure.
    ///
    /// # Errors
    ///
    /// Returns the [`ReturnFailure`] whose [`redirect`](ReturnFailure::redirect)
    /// leads back to checkout. The flow is back in [`CheckoutPhase::Idle`].
    #[instrument(skip(self, store))]
    pub async fn complete_cashfree_return<A>(
        &mut self,
        store: &mut AppStore<A>,
        order_id: Option<OrderId>,
    ) -> Result<String, ReturnFailure>
    where
        A: StorefrontApi,
    {
        self.alert = None;
        if self.payments.cashfree_app_id.is_none() {
            return Err(self.fail_return(ReturnFailure::Unavailable));
        }
        let Some(order_id) = order_id.filter(|id| !id.as_str().is_empty()) else {
            return Err(self.fail_return(ReturnFailure::MissingOrderId));
        };

        self.transition(CheckoutPhase::VerifyingPayment);
        if let Err(e) = store
            .api()
            .verify_cashfree_payment(&CashfreeVerification {
                order_id: order_id.clone(),
            })
            .await
        {
            warn!(error = %e, %order_id, "Cashfree verification failed");
            return Err(self.fail_return(ReturnFailure::VerificationFailed));
        }

        store.clear_cart();
        info!(%order_id, "Cashfree payment verified");
        let redirect = confirmation_path(&order_id);
        self.transition(CheckoutPhase::Succeeded { order_id });
        Ok(redirect)
    }

    /// Handle the hosted page's failure return.
    ///
    /// Returns the checkout path carrying the failure code.
    #[must_use]
    pub fn cashfree_failure(&mut self) -> String {
        self.fail_return(ReturnFailure::PaymentFailed).redirect()
    }

    fn fail_return(&mut self, failure: ReturnFailure) -> ReturnFailure {
        warn!(code = failure.code(), "Hosted payment return failed");
        self.alert = Some(failure.alert());
        self.transition(CheckoutPhase::Idle);
        failure
    }

    fn key_for(&self, method: PaymentMethod) -> Result<String, CheckoutError> {
        match method {
            PaymentMethod::Razorpay => self
                .payments
                .razorpay_key_id
                .clone()
                .ok_or(CheckoutError::MethodUnavailable(method)),
            PaymentMethod::Cashfree => Err(CheckoutError::MethodUnavailable(method)),
        }
    }
}

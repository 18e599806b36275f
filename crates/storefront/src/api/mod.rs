//! REST backend access.
//!
//! # Architecture
//!
//! - [`StorefrontApi`] is the contract the stores and checkout depend on. It
//!   mirrors the backend endpoints one method per route.
//! - [`ApiClient`] implements it over `reqwest`, attaching the bearer token
//!   from [`Storage`](crate::storage::Storage) on every request and applying
//!   one timeout to all calls.
//! - Product reads are cached in memory via `moka` (5 minute TTL) and
//!   invalidated by any catalog mutation.
//!
//! # Endpoints
//!
//! ```text
//! GET    /products                          POST /auth/login
//! GET    /products/:id                      POST /auth/register
//! POST   /products                          GET  /orders/myorders
//! PUT    /products/:id                      GET  /orders/:id
//! DELETE /products/:id                      POST /orders
//! POST   /payments/razorpay/create-order
//! POST   /payments/razorpay/verify-payment
//! POST   /payments/cashfree/verify-payment
//! ```
//!
//! Every method returns a future that performs no state change on the
//! caller's side; dropping it aborts the request.

mod cache;
mod client;

pub use client::ApiClient;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estore_core::{
    AuthenticatedUser, NewOrder, Order, OrderId, Product, ProductDraft, ProductId, ProductPatch,
};

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("(no message)"))]
    Status {
        /// Response status.
        status: StatusCode,
        /// The `message` field of the error body, when present.
        message: Option<String>,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Backend-supplied message, if the error carried one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Human-readable message for display: the backend message, else `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.backend_message().unwrap_or(fallback).to_string()
    }

    /// Whether the backend rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /payments/razorpay/create-order`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GatewayOrderRequest {
    /// Order total in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Gateway-side order token returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id handed to the widget.
    pub id: String,
    /// Amount as the gateway expects it (smallest currency unit).
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Body of `POST /payments/razorpay/verify-payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentVerification {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
    /// The preliminary order the payment settles.
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

/// Body of `POST /payments/cashfree/verify-payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashfreeVerification {
    pub order_id: OrderId,
}

/// Result of payment verification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerificationResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl VerificationResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// The backend surface the storefront consumes.
pub trait StorefrontApi {
    /// `GET /products`
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// `GET /products/:id`
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError>;

    /// `POST /products`
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError>;

    /// `PUT /products/:id`
    async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError>;

    /// `DELETE /products/:id`
    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError>;

    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthenticatedUser, ApiError>;

    /// `POST /auth/register`
    async fn register(
        &self,
        request: &RegisterRequest<'_>,
    ) -> Result<AuthenticatedUser, ApiError>;

    /// `GET /orders/myorders`
    async fn my_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// `GET /orders/:id`
    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError>;

    /// `POST /orders`
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError>;

    /// `POST /payments/razorpay/create-order`
    async fn create_gateway_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, ApiError>;

    /// `POST /payments/razorpay/verify-payment`
    async fn verify_payment(
        &self,
        verification: &PaymentVerification,
    ) -> Result<VerificationResponse, ApiError>;

    /// `POST /payments/cashfree/verify-payment`
    ///
    /// Any 2xx counts as verified; the body is not inspected.
    async fn verify_cashfree_payment(
        &self,
        verification: &CashfreeVerification,
    ) -> Result<(), ApiError>;
}

/// Error body shape used by the backend.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pull the `message` field out of an error response body.
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

//! In-process fakes shared by unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use tokio::sync::mpsc::UnboundedSender;

use estore_core::{
    AuthenticatedUser, NewOrder, Order, OrderId, OrderUser, Product, ProductDraft, ProductId,
    ProductPatch, Role, ShippingAddress, User, UserId,
};

use crate::api::{
    ApiError, CashfreeVerification, GatewayOrder, GatewayOrderRequest, LoginRequest,
    PaymentVerification, RegisterRequest, StorefrontApi, VerificationResponse,
};
use crate::checkout::{PaymentWidget, WidgetError, WidgetEvent, WidgetOptions};

/// Names of calls in the order they happened, shared between fakes.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

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

pub(crate) fn user(id: &str) -> User {
    User {
        id: UserId::new(id),
        name: "Asha".to_string(),
        email: format!("{id}@example.com"),
        role: Role::User,
    }
}

pub(crate) fn shipping() -> ShippingAddress {
    ShippingAddress {
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        postal_code: "560001".to_string(),
    }
}

fn not_found(message: &str) -> ApiError {
    ApiError::Status {
        status: StatusCode::NOT_FOUND,
        message: Some(message.to_string()),
    }
}

/// Backend fake keeping products and orders in memory.
pub(crate) struct FakeApi {
    products: Mutex<Vec<Product>>,
    orders: Mutex<Vec<Order>>,
    failing: HashSet<&'static str>,
    register_rejection: Option<String>,
    verification_status: String,
    calls: CallLog,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            register_rejection: None,
            verification_status: "success".to_string(),
            calls: Arc::default(),
        }
    }

    pub(crate) fn with_products(self, products: Vec<Product>) -> Self {
        *self.products.lock().unwrap() = products;
        self
    }

    /// Make `operation` fail with a 500 and no message.
    pub(crate) fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub(crate) fn rejecting_register(mut self, message: &str) -> Self {
        self.register_rejection = Some(message.to_string());
        self
    }

    pub(crate) fn verification_status(mut self, status: &str) -> Self {
        self.verification_status = status.to_string();
        self
    }

    pub(crate) fn call_log(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, operation: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.contains(operation) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            });
        }
        Ok(())
    }

    fn sign_in(name: &str, email: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user: User {
                id: UserId::new(format!("user-{email}")),
                name: name.to_string(),
                email: email.to_string(),
                role: Role::User,
            },
            token: format!("token-{email}"),
        }
    }
}

impl StorefrontApi for FakeApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record("list_products")?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.record("get_product")?;
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| not_found("Product not found"))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.record("create_product")?;
        let mut products = self.products.lock().unwrap();
        let mut created = product(&format!("new-{}", products.len() + 1), 0);
        created.name.clone_from(&draft.name);
        created.price = draft.price;
        created.stock = draft.stock;
        products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        self.record("update_product")?;
        let mut products = self.products.lock().unwrap();
        let existing = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| not_found("Product not found"))?;
        if let Some(name) = &patch.name {
            existing.name.clone_from(name);
        }
        if let Some(price) = patch.price {
            existing.price = price;
        }
        if let Some(stock) = patch.stock {
            existing.stock = stock;
        }
        Ok(existing.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.record("delete_product")?;
        self.products.lock().unwrap().retain(|p| &p.id != id);
        Ok(())
    }

    async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthenticatedUser, ApiError> {
        self.record("login")?;
        Ok(Self::sign_in("Asha", request.email))
    }

    async fn register(
        &self,
        request: &RegisterRequest<'_>,
    ) -> Result<AuthenticatedUser, ApiError> {
        self.record("register")?;
        if let Some(message) = &self.register_rejection {
            return Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                message: Some(message.clone()),
            });
        }
        Ok(Self::sign_in(request.name, request.email))
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.record("my_orders")?;
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.record("get_order")?;
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| not_found("Order not found"))
    }

    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.record("create_order")?;
        let mut orders = self.orders.lock().unwrap();
        let now = Utc::now();
        let created = Order {
            id: OrderId::new(format!("order-{}", orders.len() + 1)),
            user: OrderUser {
                id: UserId::new("u1"),
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
            },
            order_items: order.order_items.clone(),
            shipping_address: order.shipping_address.clone(),
            payment_method: order.payment_method.clone(),
            payment_result: order.payment_result.clone(),
            pricing: order.pricing,
            is_paid: order.is_paid,
            paid_at: order.paid_at,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };
        orders.push(created.clone());
        Ok(created)
    }

    async fn create_gateway_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, ApiError> {
        self.record("create_gateway_order")?;
        Ok(GatewayOrder {
            id: "order_rzp_1".to_string(),
            amount: request.amount * Decimal::from(100),
        })
    }

    async fn verify_payment(
        &self,
        _verification: &PaymentVerification,
    ) -> Result<VerificationResponse, ApiError> {
        self.record("verify_payment")?;
        Ok(VerificationResponse {
            status: self.verification_status.clone(),
            message: None,
        })
    }

    async fn verify_cashfree_payment(
        &self,
        _verification: &CashfreeVerification,
    ) -> Result<(), ApiError> {
        self.record("verify_cashfree_payment")
    }
}

/// Widget fake that replies with a scripted event as soon as it opens.
///
/// With no scripted event the sender is dropped, which reads as dismissal.
pub(crate) struct FakeWidget {
    calls: CallLog,
    script: Option<WidgetEvent>,
    pub(crate) opened_with: Option<WidgetOptions>,
}

impl FakeWidget {
    pub(crate) fn new(calls: CallLog, script: Option<WidgetEvent>) -> Self {
        Self {
            calls,
            script,
            opened_with: None,
        }
    }
}

impl PaymentWidget for FakeWidget {
    fn open(
        &mut self,
        options: WidgetOptions,
        events: UnboundedSender<WidgetEvent>,
    ) -> Result<(), WidgetError> {
        self.calls.lock().unwrap().push("widget.open".to_string());
        self.opened_with = Some(options);
        if let Some(event) = self.script.take() {
            events
                .send(event)
                .map_err(|e| WidgetError(e.to_string()))?;
        }
        Ok(())
    }
}

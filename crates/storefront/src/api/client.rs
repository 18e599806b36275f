//! `reqwest` implementation of [`StorefrontApi`].

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use estore_core::{
    AuthenticatedUser, NewOrder, Order, OrderId, Product, ProductDraft, ProductId, ProductPatch,
};

use super::cache::{CacheKey, CacheValue};
use super::{
    ApiError, CashfreeVerification, GatewayOrder, GatewayOrderRequest, LoginRequest,
    PaymentVerification, RegisterRequest, StorefrontApi, VerificationResponse, extract_message,
};
use crate::config::ClientConfig;
use crate::storage::Storage;

/// Maximum characters of a response body included in logs.
const LOG_BODY_LIMIT: usize = 500;

/// Client for the storefront REST backend.
///
/// Cheap to clone. Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn Storage>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// `storage` is consulted for the bearer token before every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                storage,
                cache,
            }),
        })
    }

    /// Build the URL for an endpoint, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Read the current token. A broken cookie store means an anonymous request.
    fn bearer_token(&self) -> Option<SecretString> {
        match self.inner.storage.token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read auth token; sending request without it");
                None
            }
        }
    }

    /// Send a request and return the raw body of a successful response.
    async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let mut request = self.inner.client.request(method.clone(), url);

        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(
                %method,
                status = %status,
                body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                message: extract_message(&text),
            });
        }

        Ok(text)
    }

    /// Send a request and decode the JSON response.
    async fn request<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.send(method, segments, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(
                error = %e,
                body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every cached catalog response.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

impl StorefrontApi for ApiClient {
    // =========================================================================
    // Catalog
    // =========================================================================

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .request(Method::GET, &["products"], None::<&()>)
            .await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .request(Method::GET, &["products", id.as_str()], None::<&()>)
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let product = self
            .request(Method::POST, &["products"], Some(draft))
            .await?;
        self.invalidate_catalog().await;
        Ok(product)
    }

    #[instrument(skip(self, patch), fields(product_id = %id))]
    async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let product = self
            .request(Method::PUT, &["products", id.as_str()], Some(patch))
            .await?;
        self.invalidate_catalog().await;
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &["products", id.as_str()], None::<&()>)
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthenticatedUser, ApiError> {
        self.request(Method::POST, &["auth", "login"], Some(request))
            .await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(
        &self,
        request: &RegisterRequest<'_>,
    ) -> Result<AuthenticatedUser, ApiError> {
        self.request(Method::POST, &["auth", "register"], Some(request))
            .await
    }

    // =========================================================================
    // Orders (not cached - mutable state)
    // =========================================================================

    #[instrument(skip(self))]
    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.request(Method::GET, &["orders", "myorders"], None::<&()>)
            .await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.request(Method::GET, &["orders", id.as_str()], None::<&()>)
            .await
    }

    #[instrument(skip(self, order), fields(items = order.order_items.len(), is_paid = order.is_paid))]
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.request(Method::POST, &["orders"], Some(order)).await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    #[instrument(skip(self), fields(amount = %request.amount))]
    async fn create_gateway_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, ApiError> {
        self.request(
            Method::POST,
            &["payments", "razorpay", "create-order"],
            Some(request),
        )
        .await
    }

    #[instrument(skip(self, verification), fields(order_id = %verification.order_id))]
    async fn verify_payment(
        &self,
        verification: &PaymentVerification,
    ) -> Result<VerificationResponse, ApiError> {
        self.request(
            Method::POST,
            &["payments", "razorpay", "verify-payment"],
            Some(verification),
        )
        .await
    }

    #[instrument(skip(self, verification), fields(order_id = %verification.order_id))]
    async fn verify_cashfree_payment(
        &self,
        verification: &CashfreeVerification,
    ) -> Result<(), ApiError> {
        self.send(
            Method::POST,
            &["payments", "cashfree", "verify-payment"],
            Some(verification),
        )
        .await?;
        Ok(())
    }
}

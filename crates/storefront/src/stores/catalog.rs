//! Product catalog slice.

use tracing::{instrument, warn};

use estore_core::{Product, ProductDraft, ProductId, ProductPatch};

use crate::api::StorefrontApi;

/// Fetched products plus loading and error flags.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    selected_product: Option<Product>,
    loading: bool,
    error: Option<String>,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Catalog request failed");
        self.error = Some(message);
        self.loading = false;
    }

    /// Replace the product list with the backend's.
    #[instrument(skip(self, api))]
    pub async fn fetch_products<A: StorefrontApi>(&mut self, api: &A) {
        self.begin();
        match api.list_products().await {
            Ok(products) => {
                self.products = products;
                self.loading = false;
            }
            Err(e) => self.fail(e.message_or("Failed to fetch products")),
        }
    }

    /// Load one product into the selected slot.
    ///
    /// The previous selection is cleared before the request so a detail view
    /// never shows the wrong product while loading.
    #[instrument(skip(self, api), fields(product_id = %id))]
    pub async fn fetch_product_by_id<A: StorefrontApi>(&mut self, api: &A, id: &ProductId) {
        self.selected_product = None;
        self.begin();
        match api.get_product(id).await {
            Ok(product) => {
                self.selected_product = Some(product);
                self.loading = false;
            }
            Err(e) => self.fail(e.message_or("Failed to fetch product")),
        }
    }

    /// Create a product, then reload the list.
    #[instrument(skip(self, api, draft), fields(name = %draft.name))]
    pub async fn create_product<A: StorefrontApi>(&mut self, api: &A, draft: &ProductDraft) -> bool {
        self.begin();
        match api.create_product(draft).await {
            Ok(_) => {
                self.fetch_products(api).await;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to create product"));
                false
            }
        }
    }

    /// Apply a partial update; the returned product replaces the listed one.
    #[instrument(skip(self, api, patch), fields(product_id = %id))]
    pub async fn update_product<A: StorefrontApi>(
        &mut self,
        api: &A,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> bool {
        self.begin();
        match api.update_product(id, patch).await {
            Ok(updated) => {
                if let Some(slot) = self.products.iter_mut().find(|p| p.id == updated.id) {
                    *slot = updated.clone();
                }
                if self
                    .selected_product
                    .as_ref()
                    .is_some_and(|p| p.id == updated.id)
                {
                    self.selected_product = Some(updated);
                }
                self.loading = false;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to update product"));
                false
            }
        }
    }

    /// Delete a product and drop it from the local list.
    #[instrument(skip(self, api), fields(product_id = %id))]
    pub async fn delete_product<A: StorefrontApi>(&mut self, api: &A, id: &ProductId) -> bool {
        self.begin();
        match api.delete_product(id).await {
            Ok(()) => {
                self.products.retain(|p| &p.id != id);
                if self.selected_product.as_ref().is_some_and(|p| &p.id == id) {
                    self.selected_product = None;
                }
                self.loading = false;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to delete product"));
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, product};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_fetch_products_replaces_list() {
        let api = FakeApi::new().with_products(vec![product("p1", 100), product("p2", 50)]);
        let mut catalog = CatalogStore::new();

        catalog.fetch_products(&api).await;

        assert_eq!(catalog.products().len(), 2);
        assert!(!catalog.loading());
        assert!(catalog.error().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_uses_fallback_message() {
        let api = FakeApi::new().failing("list_products");
        let mut catalog = CatalogStore::new();

        catalog.fetch_products(&api).await;

        assert_eq!(catalog.error(), Some("Failed to fetch products"));
        assert!(!catalog.loading());
    }

    #[tokio::test]
    async fn test_fetch_by_id_clears_previous_selection_on_failure() {
        let api = FakeApi::new().with_products(vec![product("p1", 100)]);
        let mut catalog = CatalogStore::new();
        catalog.fetch_product_by_id(&api, &ProductId::new("p1")).await;
        assert!(catalog.selected_product().is_some());

        catalog.fetch_product_by_id(&api, &ProductId::new("missing")).await;

        assert!(catalog.selected_product().is_none());
        assert_eq!(catalog.error(), Some("Product not found"));
    }

    #[tokio::test]
    async fn test_update_replaces_entry_in_place() {
        let api = FakeApi::new().with_products(vec![product("p1", 100), product("p2", 50)]);
        let mut catalog = CatalogStore::new();
        catalog.fetch_products(&api).await;

        let patch = ProductPatch {
            price: Some(Decimal::from(75)),
            ..ProductPatch::default()
        };
        assert!(catalog.update_product(&api, &ProductId::new("p2"), &patch).await);

        assert_eq!(catalog.products()[1].id.as_str(), "p2");
        assert_eq!(catalog.products()[1].price, Decimal::from(75));
    }

    #[tokio::test]
    async fn test_delete_removes_locally() {
        let api = FakeApi::new().with_products(vec![product("p1", 100), product("p2", 50)]);
        let mut catalog = CatalogStore::new();
        catalog.fetch_products(&api).await;

        assert!(catalog.delete_product(&api, &ProductId::new("p1")).await);

        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.products()[0].id.as_str(), "p2");
    }

    #[tokio::test]
    async fn test_create_failure_returns_false() {
        let api = FakeApi::new().failing("create_product");
        let mut catalog = CatalogStore::new();
        let draft = ProductDraft {
            name: "Lamp".to_string(),
            description: String::new(),
            price: Decimal::from(10),
            category: "Home".to_string(),
            stock: 1,
            images: Vec::new(),
        };

        assert!(!catalog.create_product(&api, &draft).await);
        assert_eq!(catalog.error(), Some("Failed to create product"));
    }
}

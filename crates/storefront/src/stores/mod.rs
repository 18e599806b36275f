//! Client-side state.
//!
//! [`AppStore`] aggregates one slice per concern and owns the backend client
//! and the persistence handle. Slices never persist on their own; every
//! façade method that changes the user, the cart or the address book writes
//! one snapshot before returning.
//!
//! Network-backed methods only mutate state after the awaited response, so
//! dropping one of these futures mid-request leaves the previous data in
//! place.

mod address;
mod auth;
mod cart;
mod catalog;
mod orders;

pub use address::AddressStore;
pub use auth::{AUTH_COOKIE_TTL_DAYS, AuthStore};
pub use cart::CartStore;
pub use catalog::CatalogStore;
pub use orders::OrderStore;

use std::sync::Arc;

use tracing::{error, warn};

use estore_core::{
    AddressId, NewAddress, NewOrder, Order, OrderId, Product, ProductDraft, ProductId,
    ProductPatch,
};

use crate::api::StorefrontApi;
use crate::storage::{PersistedState, Storage};

/// The combined store.
pub struct AppStore<A> {
    api: A,
    storage: Arc<dyn Storage>,
    catalog: CatalogStore,
    cart: CartStore,
    auth: AuthStore,
    addresses: AddressStore,
    orders: OrderStore,
}

impl<A> std::fmt::Debug for AppStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("cart", &self.cart)
            .field("auth", &self.auth)
            .field("addresses", &self.addresses)
            .finish_non_exhaustive()
    }
}

impl<A: StorefrontApi> AppStore<A> {
    /// Build the store, restoring the last persisted snapshot.
    ///
    /// An unreadable snapshot is logged and treated as empty. Call
    /// [`initialize_auth`](Self::initialize_auth) before trusting `user`.
    pub fn new(api: A, storage: Arc<dyn Storage>) -> Self {
        let snapshot = storage.load_snapshot().unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable snapshot");
            None
        });
        let PersistedState {
            user,
            items,
            addresses,
        } = snapshot.unwrap_or_default();

        Self {
            api,
            storage,
            catalog: CatalogStore::new(),
            cart: CartStore::from_items(items),
            auth: AuthStore::new(user),
            addresses: AddressStore::new(addresses),
            orders: OrderStore::new(),
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub const fn addresses(&self) -> &AddressStore {
        &self.addresses
    }

    pub const fn orders(&self) -> &OrderStore {
        &self.orders
    }

    fn persist(&self) {
        let state = PersistedState {
            user: self.auth.user().cloned(),
            items: self.cart.items().to_vec(),
            addresses: self.addresses.book().clone(),
        };
        if let Err(e) = self.storage.save_snapshot(&state) {
            error!(error = %e, "Failed to persist store snapshot");
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn fetch_products(&mut self) {
        self.catalog.fetch_products(&self.api).await;
    }

    pub async fn fetch_product_by_id(&mut self, id: &ProductId) {
        self.catalog.fetch_product_by_id(&self.api, id).await;
    }

    pub async fn create_product(&mut self, draft: &ProductDraft) -> bool {
        self.catalog.create_product(&self.api, draft).await
    }

    pub async fn update_product(&mut self, id: &ProductId, patch: &ProductPatch) -> bool {
        self.catalog.update_product(&self.api, id, patch).await
    }

    pub async fn delete_product(&mut self, id: &ProductId) -> bool {
        self.catalog.delete_product(&self.api, id).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn add_to_cart(&mut self, product: Product) {
        self.cart.add_to_cart(product);
        self.persist();
    }

    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        self.cart.update_quantity(product_id, quantity);
        self.persist();
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.cart.remove_from_cart(product_id);
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear_cart();
        self.persist();
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub fn initialize_auth(&mut self) {
        self.auth.initialize_auth(self.storage.as_ref());
        self.persist();
    }

    pub async fn login_user(&mut self, email: &str, password: &str) -> bool {
        let ok = self
            .auth
            .login_user(&self.api, self.storage.as_ref(), email, password)
            .await;
        self.persist();
        ok
    }

    pub async fn register_user(&mut self, name: &str, email: &str, password: &str) -> bool {
        let ok = self
            .auth
            .register_user(&self.api, self.storage.as_ref(), name, email, password)
            .await;
        self.persist();
        ok
    }

    pub fn logout_user(&mut self) {
        self.auth.logout_user(self.storage.as_ref());
        self.persist();
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    pub fn add_address(&mut self, address: NewAddress) -> AddressId {
        let id = self.addresses.add_address(address);
        self.persist();
        id
    }

    pub fn delete_address(&mut self, id: AddressId) {
        self.addresses.delete_address(id);
        self.persist();
    }

    pub fn set_default_address(&mut self, id: AddressId) {
        self.addresses.set_default_address(id);
        self.persist();
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order and clear the cart on success.
    pub async fn create_order(&mut self, order: &NewOrder) -> Option<Order> {
        let created = self
            .orders
            .create_order(&self.api, &mut self.cart, order)
            .await?;
        self.persist();
        Some(created)
    }

    /// Place an order, leaving the cart as it is.
    pub async fn create_preliminary_order(&mut self, order: &NewOrder) -> Option<Order> {
        self.orders.create_preliminary_order(&self.api, order).await
    }

    pub async fn fetch_my_orders(&mut self) {
        self.orders.fetch_my_orders(&self.api).await;
    }

    pub async fn fetch_order_by_id(&mut self, id: &OrderId) {
        self.orders.fetch_order_by_id(&self.api, id).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::{FakeApi, product, shipping, user};

    fn store_with(storage: Arc<MemoryStorage>) -> AppStore<FakeApi> {
        AppStore::new(FakeApi::new(), storage)
    }

    #[test]
    fn test_each_cart_mutation_persists_once() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = store_with(storage.clone());

        store.add_to_cart(product("p1", 100));
        store.add_to_cart(product("p1", 100));
        store.update_quantity(&ProductId::new("p1"), 5);
        store.remove_from_cart(&ProductId::new("p1"));

        assert_eq!(storage.snapshot_writes(), 4);
    }

    #[test]
    fn test_snapshot_restored_on_new() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut store = store_with(storage.clone());
            store.add_to_cart(product("p1", 100));
            store.add_to_cart(product("p2", 20));
        }

        let store = store_with(storage);
        assert_eq!(store.cart().item_count(), 2);
    }

    #[test]
    fn test_initialize_auth_drops_persisted_user_without_cookie() {
        let storage = Arc::new(MemoryStorage::with_snapshot(PersistedState {
            user: Some(user("u1")),
            ..PersistedState::default()
        }));
        let mut store = store_with(storage.clone());
        assert!(store.auth().user().is_some());

        store.initialize_auth();

        assert!(store.auth().user().is_none());
        assert!(storage.load_snapshot().unwrap().unwrap().user.is_none());
    }

    #[tokio::test]
    async fn test_login_persists_user_but_not_token() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = store_with(storage.clone());

        assert!(store.login_user("asha@example.com", "pw").await);

        let snapshot = storage.load_snapshot().unwrap().unwrap();
        assert_eq!(snapshot.user.unwrap().email, "asha@example.com");
        assert!(
            !serde_json::to_string(&storage.load_snapshot().unwrap())
                .unwrap()
                .contains("token-")
        );
    }

    #[tokio::test]
    async fn test_create_order_persists_cleared_cart() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = store_with(storage.clone());
        store.add_to_cart(product("p1", 100));
        let order = NewOrder::unpaid(store.cart().items(), shipping(), "Razorpay");

        assert!(store.create_order(&order).await.is_some());

        assert!(store.cart().is_empty());
        assert!(storage.load_snapshot().unwrap().unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_create_order_failure_keeps_persisted_cart() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = AppStore::new(FakeApi::new().failing("create_order"), storage.clone());
        store.add_to_cart(product("p1", 100));
        let writes = storage.snapshot_writes();
        let order = NewOrder::unpaid(store.cart().items(), shipping(), "Razorpay");

        assert!(store.create_order(&order).await.is_none());

        assert_eq!(store.cart().item_count(), 1);
        assert_eq!(storage.snapshot_writes(), writes);
    }

    #[test]
    fn test_address_mutations_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = store_with(storage.clone());

        let id = store.add_address(NewAddress {
            kind: "Work".to_string(),
            address: "1 Tech Park".to_string(),
            city: "Pune".to_string(),
            postal_code: "411057".to_string(),
            is_default: false,
        });
        store.set_default_address(id);

        let saved = storage.load_snapshot().unwrap().unwrap().addresses;
        assert_eq!(saved.default_address().map(|a| a.id), Some(id));
    }
}

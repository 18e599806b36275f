//! Auth slice.
//!
//! The user object lives in the persisted snapshot; the bearer token lives
//! only in the auth cookie held by [`Storage`]. A user without a live cookie
//! is stale and gets cleared by [`AuthStore::initialize_auth`].

use chrono::{Duration, Utc};
use secrecy::SecretString;
use tracing::{error, info, instrument, warn};

use estore_core::{AuthenticatedUser, User};

use crate::api::{ApiError, LoginRequest, RegisterRequest, StorefrontApi};
use crate::storage::Storage;

/// Lifetime of the auth cookie.
pub const AUTH_COOKIE_TTL_DAYS: i64 = 30;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Current identity plus loading and error flags.
#[derive(Debug, Clone)]
pub struct AuthStore {
    user: Option<User>,
    auth_loading: bool,
    auth_error: Option<String>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AuthStore {
    /// Start with a restored user. Loading stays set until
    /// [`initialize_auth`](Self::initialize_auth) runs.
    #[must_use]
    pub const fn new(user: Option<User>) -> Self {
        Self {
            user,
            auth_loading: true,
            auth_error: None,
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn auth_loading(&self) -> bool {
        self.auth_loading
    }

    #[must_use]
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Reconcile the restored user with the auth cookie.
    pub fn initialize_auth(&mut self, storage: &dyn Storage) {
        let has_token = match storage.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Could not read auth cookie; treating session as signed out");
                false
            }
        };

        if !has_token && self.user.take().is_some() {
            info!("Cleared stale user without auth cookie");
        }
        self.auth_loading = false;
    }

    #[instrument(skip(self, api, storage, password))]
    pub async fn login_user<A: StorefrontApi>(
        &mut self,
        api: &A,
        storage: &dyn Storage,
        email: &str,
        password: &str,
    ) -> bool {
        self.auth_loading = true;
        self.auth_error = None;
        let result = api.login(&LoginRequest { email, password }).await;
        self.finish_sign_in(storage, result, LOGIN_FAILED)
    }

    #[instrument(skip(self, api, storage, password))]
    pub async fn register_user<A: StorefrontApi>(
        &mut self,
        api: &A,
        storage: &dyn Storage,
        name: &str,
        email: &str,
        password: &str,
    ) -> bool {
        self.auth_loading = true;
        self.auth_error = None;
        let result = api
            .register(&RegisterRequest {
                name,
                email,
                password,
            })
            .await;
        self.finish_sign_in(storage, result, REGISTER_FAILED)
    }

    fn finish_sign_in(
        &mut self,
        storage: &dyn Storage,
        result: Result<AuthenticatedUser, ApiError>,
        fallback: &str,
    ) -> bool {
        self.auth_loading = false;

        let AuthenticatedUser { user, token } = match result {
            Ok(authenticated) => authenticated,
            Err(e) => {
                warn!(error = %e, "Sign-in rejected");
                self.user = None;
                self.auth_error = Some(e.message_or(fallback));
                return false;
            }
        };

        let expires_at = Utc::now() + Duration::days(AUTH_COOKIE_TTL_DAYS);
        if let Err(e) = storage.set_token(&SecretString::from(token), expires_at) {
            error!(error = %e, "Failed to store auth cookie");
            self.user = None;
            self.auth_error = Some(format!("Could not save session: {e}"));
            return false;
        }

        info!(user_id = %user.id, "Signed in");
        self.user = Some(user);
        true
    }

    /// Forget the user and remove the auth cookie.
    pub fn logout_user(&mut self, storage: &dyn Storage) {
        self.user = None;
        self.auth_error = None;
        if let Err(e) = storage.remove_token() {
            error!(error = %e, "Failed to remove auth cookie");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::{FakeApi, user};
    use secrecy::ExposeSecret;

    #[test]
    fn test_initialize_without_cookie_clears_user() {
        let storage = MemoryStorage::new();
        let mut auth = AuthStore::new(Some(user("u1")));
        assert!(auth.auth_loading());

        auth.initialize_auth(&storage);

        assert!(auth.user().is_none());
        assert!(!auth.auth_loading());
    }

    #[test]
    fn test_initialize_with_cookie_keeps_user() {
        let storage = MemoryStorage::new();
        storage
            .set_token(&SecretString::from("t"), Utc::now() + Duration::days(1))
            .unwrap();
        let mut auth = AuthStore::new(Some(user("u1")));

        auth.initialize_auth(&storage);

        assert_eq!(auth.user().unwrap().id.as_str(), "u1");
    }

    #[test]
    fn test_initialize_with_expired_cookie_clears_user() {
        let storage = MemoryStorage::new();
        storage
            .set_token(&SecretString::from("t"), Utc::now() - Duration::days(1))
            .unwrap();
        let mut auth = AuthStore::new(Some(user("u1")));

        auth.initialize_auth(&storage);

        assert!(auth.user().is_none());
    }

    #[tokio::test]
    async fn test_login_stores_user_and_cookie() {
        let api = FakeApi::new();
        let storage = MemoryStorage::new();
        let mut auth = AuthStore::default();

        assert!(auth.login_user(&api, &storage, "asha@example.com", "pw").await);

        assert_eq!(auth.user().unwrap().email, "asha@example.com");
        assert_eq!(
            storage.token().unwrap().unwrap().expose_secret(),
            "token-asha@example.com"
        );
        assert!(!auth.auth_loading());
    }

    #[tokio::test]
    async fn test_failed_login_clears_prior_user() {
        let api = FakeApi::new().failing("login");
        let storage = MemoryStorage::new();
        let mut auth = AuthStore::new(Some(user("u1")));

        assert!(!auth.login_user(&api, &storage, "a@b.c", "wrong").await);

        assert!(auth.user().is_none());
        assert_eq!(auth.auth_error(), Some(LOGIN_FAILED));
    }

    #[tokio::test]
    async fn test_register_failure_prefers_backend_message() {
        let api = FakeApi::new().rejecting_register("User already exists");
        let storage = MemoryStorage::new();
        let mut auth = AuthStore::default();

        assert!(!auth.register_user(&api, &storage, "A", "a@b.c", "pw").await);

        assert_eq!(auth.auth_error(), Some("User already exists"));
    }

    #[tokio::test]
    async fn test_logout_removes_cookie_and_error() {
        let api = FakeApi::new().failing("login");
        let storage = MemoryStorage::new();
        let mut auth = AuthStore::default();
        auth.login_user(&api, &storage, "a@b.c", "pw").await;
        storage
            .set_token(&SecretString::from("t"), Utc::now() + Duration::days(1))
            .unwrap();

        auth.logout_user(&storage);

        assert!(auth.user().is_none());
        assert!(auth.auth_error().is_none());
        assert!(storage.token().unwrap().is_none());
    }
}

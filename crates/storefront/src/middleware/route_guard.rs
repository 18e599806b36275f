//! Auth-aware redirects in front of the storefront pages.
//!
//! The decision itself lives in [`estore_core::route_guard`]; this layer only
//! reads the `auth_token` cookie and turns a redirect decision into a
//! `307 Temporary Redirect`.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use estore_core::route_guard::{AUTH_COOKIE_NAME, GuardDecision, guard};

/// Redirect signed-out visitors away from protected pages and signed-in
/// visitors away from the login and register pages.
pub async fn route_guard_middleware(jar: CookieJar, request: Request, next: Next) -> Response {
    let authenticated = jar
        .get(AUTH_COOKIE_NAME)
        .is_some_and(|cookie| !cookie.value().is_empty());

    match guard(request.uri().path(), authenticated) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(location) => {
            debug!(
                path = %request.uri().path(),
                authenticated,
                location = %location,
                "Route guard redirect"
            );
            Redirect::temporary(&location).into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{StatusCode, header},
        middleware::from_fn,
        routing::get,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/admin", get(|| async { "admin" }))
            .route("/login", get(|| async { "login" }))
            .route("/products", get(|| async { "products" }))
            .layer(from_fn(route_guard_middleware))
    }

    async fn send(path: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_signed_out_admin_redirects_to_login() {
        let response = send("/admin", None).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login?redirect=/admin");
    }

    #[tokio::test]
    async fn test_signed_in_login_redirects_home() {
        let response = send("/login", Some("auth_token=jwt-abc")).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_signed_in_admin_passes() {
        let response = send("/admin", Some("theme=dark; auth_token=jwt-abc")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_page_passes_either_way() {
        assert_eq!(send("/products", None).await.status(), StatusCode::OK);
        assert_eq!(
            send("/products", Some("auth_token=jwt-abc")).await.status(),
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_empty_cookie_counts_as_signed_out() {
        let response = send("/admin", Some("auth_token=")).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}

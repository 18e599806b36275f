//! Edge server router.
//!
//! Serves the built storefront pages from the static directory, with the
//! route guard deciding which requests reach them.

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::from_fn,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::{AppError, Result};
use crate::middleware::{request_id_middleware, route_guard_middleware};
use crate::state::AppState;

/// Build the edge router. Sentry layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let pages = ServeDir::new(state.static_dir()).append_index_html_on_directories(true);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .fallback_service(pages)
        .with_state(state)
        .layer(from_fn(route_guard_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 until the static directory exists. A missing directory is the
/// expected not-ready state and is not reported to Sentry.
async fn readiness(State(state): State<AppState>) -> Result<StatusCode> {
    let metadata = match tokio::fs::metadata(state.static_dir()).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotReady(format!(
                "{} does not exist",
                state.static_dir().display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_dir() {
        return Err(AppError::NotReady(format!(
            "{} is not a directory",
            state.static_dir().display()
        )));
    }
    Ok(StatusCode::OK)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use axum::{
        body::{Body, to_bytes},
        http::header,
    };
    use tower::ServiceExt;

    use crate::config::EdgeConfig;

    fn state(static_dir: PathBuf) -> AppState {
        AppState::new(EdgeConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            static_dir,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        })
    }

    fn get_request(path: &str) -> Request {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(state(dir.path().to_path_buf()))
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_requires_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(dir.path().join("missing")));
        let response = app.oneshot(get_request("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let app = router(state(dir.path().to_path_buf()));
        let response = app.oneshot(get_request("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_static_dir_is_not_ready_not_io() {
        let dir = tempfile::tempdir().unwrap();
        let result = readiness(State(state(dir.path().join("missing")))).await;
        assert!(matches!(result, Err(AppError::NotReady(_))));

        std::fs::write(dir.path().join("file"), "x").unwrap();
        let result = readiness(State(state(dir.path().join("file")))).await;
        assert!(matches!(result, Err(AppError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_pages_served_behind_guard() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("admin")).unwrap();
        std::fs::write(dir.path().join("admin/index.html"), "admin page").unwrap();
        std::fs::write(dir.path().join("index.html"), "home page").unwrap();
        let app = router(state(dir.path().to_path_buf()));

        let response = app.clone().oneshot(get_request("/admin")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?redirect=/admin"
        );

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"home page");
    }

    #[tokio::test]
    async fn test_non_canonical_paths_cannot_reach_protected_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("admin")).unwrap();
        std::fs::write(dir.path().join("admin/index.html"), "admin page").unwrap();
        let app = router(state(dir.path().to_path_buf()));

        for path in ["//admin/", "/%61dmin/", "//admin/index.html", "/%61dmin/index.html"] {
            let response = app.clone().oneshot(get_request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
            let location = response.headers()[header::LOCATION].to_str().unwrap();
            assert!(location.starts_with("/login?redirect=/admin"), "{path}");
        }
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(state(dir.path().to_path_buf()))
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}

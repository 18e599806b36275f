//! Route guard decisions.
//!
//! A pure function of the request path and whether an auth cookie is
//! present. The edge server turns a [`GuardDecision`] into an HTTP redirect;
//! keeping the decision here lets it be tested without a server.

/// Cookie that carries the bearer token. Read by the edge guard and by the
/// REST client when attaching the `Authorization` header.
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Path prefixes that require a signed-in user.
pub const PROTECTED_PATHS: &[&str] = &["/profile", "/admin", "/checkout"];

/// Path prefixes only meaningful to signed-out users.
pub const AUTH_PATHS: &[&str] = &["/login", "/register"];

/// Path prefixes the guard never inspects (API proxying, assets).
pub const BYPASS_PATHS: &[&str] = &["/api", "/static", "/favicon.ico"];

/// Where signed-out users are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where signed-in users visiting an auth page are sent.
pub const HOME_PATH: &str = "/";

/// Outcome of guarding one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through unchanged.
    Pass,
    /// Redirect to the given path (may include a query string).
    Redirect(String),
}

/// Decide what to do with a request for `path`.
///
/// The path is canonicalized first (see [`canonical_path`]) so that the
/// decision is made on the same path the file server resolves.
///
/// - Signed-in users hitting `/login` or `/register` go home.
/// - Signed-out users hitting a protected prefix go to
///   `/login?redirect=<path>` so they can be sent back after signing in.
/// - Everything else passes.
#[must_use]
pub fn guard(path: &str, authenticated: bool) -> GuardDecision {
    let path = canonical_path(path);

    if matches_any(&path, BYPASS_PATHS) {
        return GuardDecision::Pass;
    }

    if authenticated && matches_any(&path, AUTH_PATHS) {
        return GuardDecision::Redirect(HOME_PATH.to_string());
    }

    if !authenticated && matches_any(&path, PROTECTED_PATHS) {
        return GuardDecision::Redirect(format!(
            "{LOGIN_PATH}?redirect={}",
            encode_redirect(&path)
        ));
    }

    GuardDecision::Pass
}

/// Percent-decode `raw` and drop empty and `.` segments.
///
/// `//admin/`, `/%61dmin` and `/./admin` all become `/admin`. Invalid UTF-8
/// after decoding is replaced rather than rejected.
#[must_use]
pub fn canonical_path(raw: &str) -> String {
    let decoded = urlencoding::decode_binary(raw.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    let segments: Vec<&str> = decoded
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    format!("/{}", segments.join("/"))
}

/// Encode a path for use as a query value, keeping `/` readable.
fn encode_redirect(path: &str) -> String {
    urlencoding::encode(path).replace("%2F", "/")
}

/// Prefix match that respects segment boundaries, so `/admin` covers
/// `/admin` and `/admin/products` but not `/administrator`.
fn matches_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
    })
}

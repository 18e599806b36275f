//! HTTP middleware for the edge server.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (records into the span above)
//! 4. Route guard (may short-circuit with a redirect)

pub mod request_id;
pub mod route_guard;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use route_guard::route_guard_middleware;

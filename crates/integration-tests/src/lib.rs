//! Integration tests for E-Store.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (file-backed stores)
//! cargo test -p estore-integration-tests
//!
//! # Live tests against a running backend and edge server
//! ESTORE_API_BASE_URL=http://localhost:5000/api \
//! ESTORE_EDGE_URL=http://localhost:3000 \
//!     cargo test -p estore-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `store_persistence` - stores over `FileStorage`, no network
//! - `storefront_api` - REST client and stores against the live backend
//! - `edge_route_guard` - redirects served by the running edge binary

use chrono::{TimeZone, Utc};
use estore_core::{Product, ProductId};
use rust_decimal::Decimal;

/// Base URL of the REST backend.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("ESTORE_API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string())
}

/// Base URL of the edge server.
#[must_use]
pub fn edge_base_url() -> String {
    std::env::var("ESTORE_EDGE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A product snapshot for offline cart tests.
#[must_use]
pub fn sample_product(id: &str, price: i64) -> Product {
    let created = Utc
        .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    Product {
        id: ProductId::new(id),
        name: format!("Sample {id}"),
        description: "Integration sample".to_string(),
        price: Decimal::from(price),
        category: "Samples".to_string(),
        stock: 5,
        images: Vec::new(),
        created_at: created,
        updated_at: created,
    }
}

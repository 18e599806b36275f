//! E-Store Core - Shared domain types library.
//!
//! This crate provides the types and pure state transitions used across all
//! E-Store components:
//! - `storefront` - Client stores, REST client, checkout coordinator, edge server
//! - `cli` - Command-line shell over the storefront stores
//!
//! # Architecture
//!
//! The core crate contains only types and synchronous state transitions - no
//! I/O, no HTTP clients, no persistence. This keeps it lightweight and allows
//! the cart, address book, pricing, and route guard logic to be tested in
//! isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, products, cart, addresses, users, orders, pricing
//! - [`route_guard`] - Redirect decisions for protected and auth-only paths

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod route_guard;
pub mod types;

pub use types::*;

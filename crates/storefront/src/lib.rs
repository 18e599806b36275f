//! E-Store storefront library.
//!
//! Client-side state for the storefront: the REST client, persisted storage,
//! the store slices and the checkout coordinator. The `estore-edge` binary
//! uses the [`edge`] router to put the route guard in front of the pages.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod edge;
pub mod error;
pub mod middleware;
pub mod state;
pub mod storage;
pub mod stores;

#[cfg(test)]
pub(crate) mod test_support;

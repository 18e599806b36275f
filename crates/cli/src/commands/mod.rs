//! Command implementations.
//!
//! Every command works on the same [`AppStore`] the browser storefront uses,
//! backed by the REST API and file storage.

use estore_storefront::api::ApiClient;
use estore_storefront::stores::AppStore;
use thiserror::Error;

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

/// The store as the CLI builds it.
pub type Store = AppStore<ApiClient>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A store operation failed; carries the store's error message.
    #[error("{0}")]
    Failed(String),

    /// The command needs a signed-in user.
    #[error("Not signed in. Run `estore auth login` first.")]
    NotSignedIn,

    /// No saved address has this id.
    #[error("No saved address with id {0}")]
    UnknownAddress(i64),
}

/// Turn a store's error flag into a command error.
fn failed(message: Option<&str>, fallback: &str) -> CommandError {
    CommandError::Failed(message.unwrap_or(fallback).to_string())
}

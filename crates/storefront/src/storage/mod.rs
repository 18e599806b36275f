//! Durable client-side state.
//!
//! Two things survive a restart:
//!
//! - A snapshot of `{user, items, addresses}`, written after every relevant
//!   store mutation. It never contains the token or loading/error flags.
//! - The bearer token, kept separately as a cookie with an expiry so the
//!   edge route guard and the REST client can read it without the snapshot.
//!
//! [`FileStorage`] is the on-disk implementation used by the CLI;
//! [`MemoryStorage`] backs tests and embedders that persist elsewhere.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estore_core::{AddressBook, CartItem, User};

/// Errors reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted JSON could not be read or written.
    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// The persisted store snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub addresses: AddressBook,
}

/// Backing store for the snapshot and the auth cookie.
pub trait Storage: Send + Sync {
    /// Read the last saved snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn load_snapshot(&self) -> Result<Option<PersistedState>, StorageError>;

    /// Replace the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save_snapshot(&self, state: &PersistedState) -> Result<(), StorageError>;

    /// The auth token, or `None` if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie exists but cannot be read.
    fn token(&self) -> Result<Option<SecretString>, StorageError>;

    /// Store the auth token until `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie cannot be written.
    fn set_token(&self, token: &SecretString, expires_at: DateTime<Utc>)
    -> Result<(), StorageError>;

    /// Remove the auth token. Removing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing cookie cannot be removed.
    fn remove_token(&self) -> Result<(), StorageError>;
}

/// On-disk shape of the auth cookie.
#[derive(Serialize, Deserialize)]
struct StoredToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl StoredToken {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

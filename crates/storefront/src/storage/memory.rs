//! In-memory storage.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use super::{PersistedState, Storage, StorageError, StoredToken};

/// Keeps the snapshot and auth cookie in process memory.
///
/// Counts snapshot writes so callers can observe that every mutation is
/// persisted individually.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<PersistedState>>,
    token: Mutex<Option<StoredToken>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing snapshot, as if restored from a previous run.
    #[must_use]
    pub fn with_snapshot(state: PersistedState) -> Self {
        Self {
            snapshot: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    /// Number of snapshot writes so far.
    #[must_use]
    pub fn snapshot_writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("snapshot_writes", &self.snapshot_writes())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Storage for MemoryStorage {
    fn load_snapshot(&self) -> Result<Option<PersistedState>, StorageError> {
        Ok(self
            .snapshot
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .clone())
    }

    fn save_snapshot(&self, state: &PersistedState) -> Result<(), StorageError> {
        *self.snapshot.lock().map_err(|_| StorageError::Poisoned)? = Some(state.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn token(&self) -> Result<Option<SecretString>, StorageError> {
        let guard = self.token.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard
            .as_ref()
            .filter(|t| t.is_live(Utc::now()))
            .map(|t| SecretString::from(t.token.clone())))
    }

    fn set_token(
        &self,
        token: &SecretString,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = Some(StoredToken {
            token: token.expose_secret().to_string(),
            expires_at,
        });
        Ok(())
    }

    fn remove_token(&self) -> Result<(), StorageError> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }
}

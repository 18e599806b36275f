//! Filesystem-backed storage.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::{PersistedState, Storage, StorageError, StoredToken};

const SNAPSHOT_FILE: &str = "state.json";
const TOKEN_FILE: &str = "auth_token.json";

/// Stores the snapshot and auth cookie as JSON files in one directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for persisted files, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the persisted files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }
}

impl Storage for FileStorage {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load_snapshot(&self) -> Result<Option<PersistedState>, StorageError> {
        let Some(bytes) = read_if_exists(&self.snapshot_path())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save_snapshot(&self, state: &PersistedState) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        write_atomic(&self.snapshot_path(), &bytes, false)?;
        debug!(items = state.items.len(), "Snapshot saved");
        Ok(())
    }

    fn token(&self) -> Result<Option<SecretString>, StorageError> {
        let Some(bytes) = read_if_exists(&self.token_path())? else {
            return Ok(None);
        };
        let stored: StoredToken = serde_json::from_slice(&bytes)?;
        if !stored.is_live(Utc::now()) {
            debug!("Auth cookie expired");
            return Ok(None);
        }
        Ok(Some(SecretString::from(stored.token)))
    }

    fn set_token(
        &self,
        token: &SecretString,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let stored = StoredToken {
            token: token.expose_secret().to_string(),
            expires_at,
        };
        write_atomic(&self.token_path(), &serde_json::to_vec(&stored)?, true)
    }

    fn remove_token(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.token_path()) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => Ok(other?),
        }
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &Path, bytes: &[u8], private: bool) -> Result<(), StorageError> {
    let tmp = path.with_extension("json.tmp");
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    if private {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    #[cfg(not(unix))]
    let _ = private;

    let mut file = options.open(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

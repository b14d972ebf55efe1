//! Persisted credential storage.
//!
//! DESIGN
//! ======
//! The bearer token is the only value the client persists. It outlives the
//! in-memory session: written on login, erased on logout, read by the HTTP
//! transport (to attach `Authorization`) and by the route guard.
//!
//! `FileTokenStore` keeps a small JSON key-value document on disk so a token
//! survives process restarts. `MemoryTokenStore` is the same contract without
//! the disk, for tests and embedders that manage persistence themselves.
//!
//! An empty string is never a token: reads treat it as absent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token store io failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key-value persistence for the bearer token.
///
/// Operations are synchronous: the guard and `check_auth` run before any
/// network call and must not suspend.
pub trait TokenStore: Send + Sync {
    /// Current token, `None` when absent or empty.
    fn token(&self) -> Option<String>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_token(&self, token: &str) -> Result<(), StorageError>;

    /// Erase the token. Erasing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn clear_token(&self) -> Result<(), StorageError>;

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
            .filter(|t| !t.is_empty())
    }

    fn set_token(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON document on disk, e.g. `{"token": "eyJ..."}`.
///
/// Unknown keys written by other tools are preserved on rewrite.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, serde_json::Value>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(StorageError::Io { path: self.path.clone(), source }),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, map: &BTreeMap<String, serde_json::Value>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        // Write-then-rename so a crash never leaves a half-written document.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(map)?).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, serde_json::Value>)) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding corrupt token store");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut map);
        self.write_map(&map)
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match self.read_map() {
            Ok(map) => map
                .get(TOKEN_KEY)
                .and_then(serde_json::Value::as_str)
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token store unreadable");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.update(|map| {
            map.insert(TOKEN_KEY.to_owned(), serde_json::Value::String(token.to_owned()));
        })
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            map.remove(TOKEN_KEY);
        })
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

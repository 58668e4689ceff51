//! Bearer token storage
//!
//! The token issued at login is kept in a small key-value store under
//! [`AUTH_TOKEN_KEY`]. Every authorized request reads it back from there.
//!
//! Two stores are provided:
//! - [`FileTokenStore`]: JSON file in the data directory
//! - [`MemoryTokenStore`]: in-memory, for tests and one-off sessions

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Key under which the bearer token is stored
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Errors from a token store
#[derive(Error, Debug)]
pub enum TokenStoreError {
    /// Failed to read the store file
    #[error("Failed to read token store '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the store file
    #[error("Failed to write token store '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Store file is not a JSON object of strings
    #[error("Token store '{path}' is corrupted: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// In-memory store lock was poisoned
    #[error("Token store is unavailable")]
    Unavailable,
}

/// Persistent key-value store holding session credentials
pub trait TokenStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError>;

    /// Remove a value (no-op if absent)
    fn remove(&self, key: &str) -> Result<(), TokenStoreError>;
}

/// An opaque bearer token
///
/// Never empty: an empty stored value is treated as "no token".
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token, returning `None` for an empty or blank value
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Redacted
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Token store backed by a JSON file
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store at the given path (the file is created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let json = fs::read_to_string(&self.path).map_err(|source| TokenStoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        if json.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&json).map_err(|source| TokenStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, entries: &HashMap<String, String>) -> Result<(), TokenStoreError> {
        let write_err = |source: io::Error| TokenStoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|e| TokenStoreError::Write {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        // Atomic replace via rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding an auth token
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(AUTH_TOKEN_KEY.to_string(), token.to_string());
        }
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| TokenStoreError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| TokenStoreError::Unavailable)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| TokenStoreError::Unavailable)?;
        entries.remove(key);
        Ok(())
    }
}

/// Read the auth token, degrading to `None` when the store fails
///
/// A session that cannot be read is treated like no session at all; the
/// server will reject the request.
pub fn load_auth_token(store: &dyn TokenStore) -> Option<AuthToken> {
    match store.get(AUTH_TOKEN_KEY) {
        Ok(Some(token)) => AuthToken::new(token),
        Ok(None) => None,
        Err(e) => {
            let err = crate::error::SyncError::TokenRetrievalFailed(e.to_string());
            tracing::warn!("{}", err);
            None
        }
    }
}

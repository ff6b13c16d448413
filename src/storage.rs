//! Persistent client-side storage for the session token.
//!
//! The console keeps exactly one piece of state between runs: the bearer
//! token returned by the login endpoint. It lives in a small JSON key/value
//! file under the user's data directory, stored under a fixed key.

use crate::constants::{APP_DIR_NAME, STORAGE_FILE_NAME, TOKEN_STORAGE_KEY};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Errors raised while reading or writing the storage file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Where the HTTP client reads and clears the bearer token.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Result<Option<String>, StorageError>;
    fn set_token(&self, token: &str) -> Result<(), StorageError>;
    fn remove_token(&self) -> Result<(), StorageError>;
}

/// JSON-file backed key/value store.
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles between background tasks
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store located at `<data_dir>/schooldesk/storage.json`
    pub fn in_data_dir() -> Result<Self, StorageError> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf, StorageError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(STORAGE_FILE_NAME))
            .ok_or(StorageError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(map).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        std::fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T, StorageError>) -> Result<T, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f()
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Result<Option<String>, StorageError> {
        self.with_lock(|| {
            let map = self.read_map()?;
            Ok(map
                .get(TOKEN_STORAGE_KEY)
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
                .map(str::to_string))
        })
    }

    fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.with_lock(|| {
            let mut map = self.read_map()?;
            map.insert(TOKEN_STORAGE_KEY.to_string(), Value::String(token.to_string()));
            self.write_map(&map)
        })
    }

    fn remove_token(&self) -> Result<(), StorageError> {
        self.with_lock(|| {
            let mut map = self.read_map()?;
            if map.remove(TOKEN_STORAGE_KEY).is_some() {
                self.write_map(&map)?;
            }
            Ok(())
        })
    }
}

/// In-process store, used when nothing should touch the disk.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone())
    }

    fn set_token(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn remove_token(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

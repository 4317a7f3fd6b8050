//! String-keyed backing stores for ticklist.
//!
//! [`FileKvStore`] keeps one file per key inside a data directory and replaces
//! values atomically. [`MemoryKvStore`] is the volatile counterpart used for
//! tests and ephemeral sessions.

mod error;

pub use error::KvStoreError;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, KvStoreError>;

/// Validate a key: non-empty, no leading dot, only `[A-Za-z0-9_.-]`.
///
/// # Errors
/// Returns [`KvStoreError::InvalidKey`] when the key cannot be stored.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(KvStoreError::InvalidKey(key.to_owned()))
    }
}

/// Storage with one file per key under a data directory.
#[derive(Debug)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open (creating if needed) the data directory at `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| KvStoreError::DataDir {
            path: dir.clone(),
            source,
        })?;
        info!(dir = %dir.display(), "Opened key-value store");
        Ok(Self { dir })
    }

    /// Directory holding the values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the key is invalid, the file cannot be read, or its
    /// contents are not UTF-8.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_bytes(key)?
            .map(|bytes| String::from_utf8(bytes).map_err(|_| KvStoreError::NotUtf8(key.to_owned())))
            .transpose()
    }

    /// Read the raw bytes stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the file cannot be read.
    pub fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(KvStoreError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    /// Replace the value under `key`; readers never observe a partial write.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the write fails.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let io_err = |source| KvStoreError::Io {
            key: key.to_owned(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(value.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|err| io_err(err.error))?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    /// Remove `key`; missing keys are not an error.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the file cannot be removed.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(KvStoreError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    /// List stored keys in lexical order.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    pub fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| KvStoreError::DataDir {
            path: self.dir.clone(),
            source,
        })?;
        let mut keys = Vec::new();
        for entry in entries.flatten() {
            if !entry.file_type().is_ok_and(|kind| kind.is_file()) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && validate_key(name).is_ok()
            {
                keys.push(name.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Volatile store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the lock is poisoned.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let values = self.values.lock().map_err(|_| KvStoreError::LockError)?;
        Ok(values.get(key).cloned())
    }

    /// Read the value under `key` as bytes.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the lock is poisoned.
    pub fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key)?.map(String::into_bytes))
    }

    /// Replace the value under `key`.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the lock is poisoned.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let mut values = self.values.lock().map_err(|_| KvStoreError::LockError)?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    /// Remove `key` if present.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the lock is poisoned.
    pub fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let mut values = self.values.lock().map_err(|_| KvStoreError::LockError)?;
        values.remove(key);
        Ok(())
    }

    /// List stored keys in lexical order.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn keys(&self) -> Result<Vec<String>> {
        let values = self.values.lock().map_err(|_| KvStoreError::LockError)?;
        Ok(values.keys().cloned().collect())
    }
}

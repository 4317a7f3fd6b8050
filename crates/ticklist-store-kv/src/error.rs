//! Error types for key-value store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during key-value store operations.
#[derive(Error, Debug)]
pub enum KvStoreError {
    /// Key contains characters that cannot be used as a file name.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// The data directory could not be created or is not a directory.
    #[error("Data directory unavailable: {path}")]
    DataDir {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a value failed.
    #[error("I/O error on key {key:?}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not valid UTF-8.
    #[error("Value for key {0:?} is not valid UTF-8")]
    NotUtf8(String),

    /// Failed to acquire the in-memory store lock.
    #[error("Store lock error")]
    LockError,
}

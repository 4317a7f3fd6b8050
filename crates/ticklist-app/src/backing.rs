//! Storage abstraction behind [`TaskStore`](crate::TaskStore).

use anyhow::Error;
use std::sync::Arc;
use ticklist_store_kv::{FileKvStore, KvStoreError, MemoryKvStore};

/// Minimal string-keyed storage required by [`TaskStore`](crate::TaskStore).
pub trait BackingStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Read the raw value stored under `key`.
    ///
    /// Decoding is left to the caller, so a value that is not text is not a
    /// store failure.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

impl BackingStore for FileKvStore {
    type Error = KvStoreError;

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Self::get_bytes(self, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::set(self, key, value)
    }
}

impl BackingStore for MemoryKvStore {
    type Error = KvStoreError;

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Self::get_bytes(self, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::set(self, key, value)
    }
}

impl<S> BackingStore for &S
where
    S: BackingStore + ?Sized,
{
    type Error = S::Error;

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        (*self).get_bytes(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (*self).set(key, value)
    }
}

impl<S> BackingStore for Arc<S>
where
    S: BackingStore + ?Sized,
{
    type Error = S::Error;

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).get_bytes(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }
}

//! Side-store trait definition.

use crate::error::{StorageError, StorageResult};

/// A durable key-value side-store.
///
/// Values are opaque strings. The caller owns the serialization format of
/// every key it writes.
///
/// # Invariants
///
/// - `get` returns exactly the value most recently passed to `set`
/// - `set` replaces the previous value in full, never partially
/// - `remove` of a missing key is not an error
///
/// # Implementors
///
/// - [`super::InMemoryKvStore`] - For testing
/// - [`super::FileKvStore`] - For persistent storage
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, overwriting any prior contents.
    ///
    /// After this returns successfully the value survives process
    /// termination (for durable backends).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Checks that a key is non-empty and uses only `[A-Za-z0-9_-]`.
///
/// Keys double as file names in [`super::FileKvStore`], so anything that
/// could escape the store directory is rejected for every backend.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] for a rejected key.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

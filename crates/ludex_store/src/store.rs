//! Key-value store trait definition.

use crate::error::StoreResult;

/// A local key-value store for the catalog client.
///
/// Stores are **opaque string stores**. They hold at most one value per key
/// and provide simple overwrite/read/delete/enumerate operations. The
/// engine owns value interpretation - stores do not understand records.
///
/// # Invariants
///
/// - `set` overwrites any prior value for the key
/// - `get` returns exactly the last value set, or `None`
/// - `remove` deletes the entry if present and is a no-op otherwise
/// - `keys` returns every currently-set key, in unspecified order
/// - Stores must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`super::MemoryStore`] - for testing
/// - [`super::FileStore`] - for persistent storage
pub trait KeyValueStore: Send + Sync {
    /// Sets `key` to `value`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid for this backend or an I/O
    /// error occurs.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Returns the value for `key`, or `None` if the key is not set.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Removes the entry for `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Returns all currently-set keys, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

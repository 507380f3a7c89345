//! Entry store trait definition for dependency injection.

use crate::request::ResponseSnapshot;
use crate::store::types::StoreError;

/// Ordered key-value store holding response snapshots.
///
/// Keys are normalized absolute request URLs. The store tracks insertion
/// order of keys (not access order), which the eviction manager relies on
/// for its oldest-first batch policy. Implementations must support safe
/// concurrent `put`/`delete` per key from multiple in-flight handlers; two
/// concurrent writers for the same key resolve as last write wins.
///
/// Backings are interchangeable: an in-memory map, a filesystem directory,
/// or any embedded key-value engine that can preserve insertion order.
pub trait EntryStore: Send + Sync {
    /// Get the snapshot stored for `key`, if any.
    fn get(&self, key: &str) -> Option<ResponseSnapshot>;

    /// Store a snapshot under `key`.
    ///
    /// Overwriting an existing key replaces the snapshot but keeps the
    /// key's original position in insertion order.
    fn put(&self, key: &str, snapshot: ResponseSnapshot) -> Result<(), StoreError>;

    /// Delete the entry for `key`.
    ///
    /// Returns `true` if an entry was removed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All keys in insertion order (oldest first).
    fn keys(&self) -> Vec<String>;

    /// Whether `key` is present.
    fn contains(&self, key: &str) -> bool;

    /// Number of entries in the store.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries.
    fn clear(&self) -> Result<(), StoreError>;
}

//! In-memory entry store with insertion-order key tracking.

use crate::request::ResponseSnapshot;
use crate::store::r#trait::EntryStore;
use crate::store::types::StoreError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Entry in the memory store.
#[derive(Debug, Clone)]
struct StoredEntry {
    /// Cached response snapshot
    snapshot: ResponseSnapshot,
    /// Monotonic insertion sequence number
    seq: u64,
}

/// In-memory entry store.
///
/// Tracks insertion order via a monotonic sequence number per key. An
/// overwrite of an existing key keeps the original sequence, so the key's
/// age for eviction purposes is its first insertion.
pub struct MemoryStore {
    /// Store contents
    entries: Mutex<HashMap<String, StoredEntry>>,
    /// Next insertion sequence number
    next_seq: AtomicU64,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryStore {
    fn get(&self, key: &str) -> Option<ResponseSnapshot> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).map(|e| e.snapshot.clone())
    }

    fn put(&self, key: &str, snapshot: ResponseSnapshot) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get_mut(key) {
            Some(existing) => {
                // Overwrite keeps the original insertion position
                existing.snapshot = snapshot;
            }
            None => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                entries.insert(key.to_string(), StoredEntry { snapshot, seq });
            }
        }

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        Ok(entries.remove(key).is_some())
    }

    fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap();

        let mut keyed: Vec<(u64, String)> = entries
            .iter()
            .map(|(k, e)| (e.seq, k.clone()))
            .collect();
        keyed.sort_by_key(|(seq, _)| *seq);

        keyed.into_iter().map(|(_, k)| k).collect()
    }

    fn contains(&self, key: &str) -> bool {
        let entries = self.entries.lock().unwrap();
        entries.contains_key(key)
    }

    fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap();
        entries.len()
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
        Ok(())
    }
}

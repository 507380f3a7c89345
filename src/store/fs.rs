//! Filesystem-backed entry store.
//!
//! Persists one file per entry so tiers survive process restarts until a
//! later activation's cleanup pass deletes them. Insertion order is
//! rebuilt from file modification times when the store is opened, and
//! maintained in memory afterwards. The mtime approximation only matters
//! across restarts; within a process the in-memory sequence is exact.

use crate::request::ResponseSnapshot;
use crate::store::r#trait::EntryStore;
use crate::store::types::StoreError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::{debug, warn};

/// On-disk entry header, stored as one JSON line before the raw body.
#[derive(Debug, Serialize, Deserialize)]
struct EntryHeader {
    status: u16,
    ok: bool,
    headers: Vec<(String, String)>,
}

/// Filesystem-backed entry store.
///
/// Each entry lives in its own file named by the hex encoding of its key,
/// holding a JSON header line followed by the raw body bytes.
pub struct FsStore {
    /// Directory holding this store's entry files
    dir: PathBuf,
    /// Key to insertion sequence index
    index: Mutex<HashMap<String, u64>>,
    /// Next insertion sequence number
    next_seq: AtomicU64,
}

impl FsStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// Scans existing entry files and rebuilds the insertion-order index
    /// from file mtimes (oldest first). Unparseable files are skipped.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut found: Vec<(String, SystemTime)> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();

            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };

            let filename = match path.file_name().and_then(|n| n.to_str()) {
                Some(f) => f,
                None => continue,
            };

            match Self::filename_to_key(filename) {
                Some(key) => {
                    let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                    found.push((key, mtime));
                }
                None => {
                    warn!(file = %path.display(), "skipping unparseable entry file");
                }
            }
        }

        // Oldest mtime first so rebuilt sequences approximate insertion order
        found.sort_by_key(|(_, mtime)| *mtime);

        let mut index = HashMap::new();
        for (seq, (key, _)) in found.iter().enumerate() {
            index.insert(key.clone(), seq as u64);
        }
        let next_seq = found.len() as u64;

        debug!(
            dir = %dir.display(),
            entries = index.len(),
            "filesystem store opened"
        );

        Ok(Self {
            dir,
            index: Mutex::new(index),
            next_seq: AtomicU64::new(next_seq),
        })
    }

    /// Convert a key to its entry filename (hex-encoded, reversible).
    fn key_to_filename(key: &str) -> String {
        format!("{}.entry", hex::encode(key.as_bytes()))
    }

    /// Parse an entry filename back into a key.
    fn filename_to_key(filename: &str) -> Option<String> {
        let encoded = filename.strip_suffix(".entry")?;
        let bytes = hex::decode(encoded).ok()?;
        String::from_utf8(bytes).ok()
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(Self::key_to_filename(key))
    }

    /// Serialize a snapshot into the on-disk framing.
    fn encode(snapshot: &ResponseSnapshot) -> Result<Vec<u8>, StoreError> {
        let header = EntryHeader {
            status: snapshot.status,
            ok: snapshot.ok,
            headers: snapshot.headers.clone(),
        };
        let mut buf = serde_json::to_vec(&header)
            .map_err(|e| StoreError::InvalidConfig(format!("header encoding failed: {}", e)))?;
        buf.push(b'\n');
        buf.extend_from_slice(&snapshot.body);
        Ok(buf)
    }

    /// Parse the on-disk framing back into a snapshot.
    fn decode(key: &str, raw: &[u8]) -> Result<ResponseSnapshot, StoreError> {
        let newline = raw
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| StoreError::CorruptEntry {
                key: key.to_string(),
                reason: "missing header delimiter".to_string(),
            })?;

        let header: EntryHeader =
            serde_json::from_slice(&raw[..newline]).map_err(|e| StoreError::CorruptEntry {
                key: key.to_string(),
                reason: format!("invalid header: {}", e),
            })?;

        Ok(ResponseSnapshot {
            status: header.status,
            ok: header.ok,
            headers: header.headers,
            body: Bytes::copy_from_slice(&raw[newline + 1..]),
        })
    }

    /// The directory this store persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl EntryStore for FsStore {
    fn get(&self, key: &str) -> Option<ResponseSnapshot> {
        {
            let index = self.index.lock().unwrap();
            if !index.contains_key(key) {
                return None;
            }
        }

        let raw = match fs::read(self.entry_path(key)) {
            Ok(raw) => raw,
            Err(_) => {
                // File vanished underneath us; drop the index entry
                let mut index = self.index.lock().unwrap();
                index.remove(key);
                return None;
            }
        };

        match Self::decode(key, &raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(key = key, error = %e, "dropping corrupt cache entry");
                let mut index = self.index.lock().unwrap();
                index.remove(key);
                let _ = fs::remove_file(self.entry_path(key));
                None
            }
        }
    }

    fn put(&self, key: &str, snapshot: ResponseSnapshot) -> Result<(), StoreError> {
        let encoded = Self::encode(&snapshot)?;
        fs::write(self.entry_path(key), encoded)?;

        let mut index = self.index.lock().unwrap();
        index
            .entry(key.to_string())
            .or_insert_with(|| self.next_seq.fetch_add(1, Ordering::Relaxed));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let existed = {
            let mut index = self.index.lock().unwrap();
            index.remove(key).is_some()
        };

        if existed {
            match fs::remove_file(self.entry_path(key)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(existed)
    }

    fn keys(&self) -> Vec<String> {
        let index = self.index.lock().unwrap();

        let mut keyed: Vec<(u64, String)> =
            index.iter().map(|(k, seq)| (*seq, k.clone())).collect();
        keyed.sort_by_key(|(seq, _)| *seq);

        keyed.into_iter().map(|(_, k)| k).collect()
    }

    fn contains(&self, key: &str) -> bool {
        let index = self.index.lock().unwrap();
        index.contains_key(key)
    }

    fn len(&self) -> usize {
        let index = self.index.lock().unwrap();
        index.len()
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut index = self.index.lock().unwrap();
        for key in index.keys() {
            let path = self.dir.join(Self::key_to_filename(key));
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        index.clear();
        Ok(())
    }
}

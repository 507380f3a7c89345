//! Versioned tier registry.
//!
//! Maps logical tier names (static, dynamic, images) to physical store
//! instances tagged with the agent's version suffix. The registry is an
//! explicit value owned by the agent instance; there is no process-wide
//! singleton. Exactly one generation of each logical tier is current at a
//! time; every other generation is garbage and gets deleted by the
//! activation cleanup pass.

use crate::store::{EntryStore, FsStore, MemoryStore, StoreError};
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Logical tier holding critical documents and static assets.
pub const STATIC_TIER: &str = "static";
/// Logical tier holding network-first responses and generic images.
pub const DYNAMIC_TIER: &str = "dynamic";
/// Logical tier holding gallery images under a bounded entry count.
pub const IMAGE_TIER: &str = "images";

/// Backend supplying physical stores to the registry.
///
/// Implementations decide where tier data lives (memory, filesystem).
/// `names` must report every tier the backend knows about, including
/// generations left behind by earlier agent versions.
pub trait StoreBackend: Send + Sync {
    /// Open (or create) the store for a physical tier name.
    fn open(&self, name: &str) -> Result<Arc<dyn EntryStore>, StoreError>;

    /// Delete a physical tier and all its entries.
    fn delete(&self, name: &str) -> Result<(), StoreError>;

    /// All known physical tier names.
    fn names(&self) -> Vec<String>;
}

/// Memory-backed store backend.
///
/// Tiers exist only for the lifetime of the process. Useful for tests and
/// for hosts that provide no durable storage.
pub struct MemoryBackend {
    stores: DashMap<String, Arc<MemoryStore>>,
}

impl MemoryBackend {
    /// Create a new empty memory backend.
    pub fn new() -> Self {
        Self {
            stores: DashMap::new(),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for MemoryBackend {
    fn open(&self, name: &str) -> Result<Arc<dyn EntryStore>, StoreError> {
        let store = self
            .stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryStore::new()))
            .clone();
        Ok(store)
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.stores.remove(name);
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.stores.iter().map(|e| e.key().clone()).collect()
    }
}

/// Filesystem-backed store backend.
///
/// Each tier is a subdirectory of the backend root, so tiers survive
/// process restarts until a later activation deletes them.
pub struct FsBackend {
    root: PathBuf,
    stores: DashMap<String, Arc<FsStore>>,
}

impl FsBackend {
    /// Create a backend rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            stores: DashMap::new(),
        })
    }
}

impl StoreBackend for FsBackend {
    fn open(&self, name: &str) -> Result<Arc<dyn EntryStore>, StoreError> {
        if let Some(store) = self.stores.get(name) {
            return Ok(store.clone());
        }

        let store = Arc::new(FsStore::open(self.root.join(name))?);
        self.stores.insert(name.to_string(), store.clone());
        Ok(store)
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.stores.remove(name);

        let dir = self.root.join(name);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();

        if let Ok(dir) = std::fs::read_dir(&self.root) {
            for entry in dir.flatten() {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }

        // Include opened-but-not-yet-written tiers
        for entry in self.stores.iter() {
            if !names.contains(entry.key()) {
                names.push(entry.key().clone());
            }
        }

        names
    }
}

/// Registry of versioned tiers for one agent generation.
pub struct TierRegistry {
    backend: Arc<dyn StoreBackend>,
    version: String,
}

impl TierRegistry {
    /// Create a registry over `backend` for the given generation version.
    pub fn new(backend: Arc<dyn StoreBackend>, version: impl Into<String>) -> Self {
        Self {
            backend,
            version: version.into(),
        }
    }

    /// Physical name of a logical tier in this generation.
    ///
    /// # Examples
    ///
    /// Logical `static` at version `3.0` becomes `static-v3.0`.
    pub fn versioned_name(&self, tier: &str) -> String {
        format!("{}-v{}", tier, self.version)
    }

    /// Open (or create) a logical tier for this generation.
    pub fn open(&self, tier: &str) -> Result<Arc<dyn EntryStore>, StoreError> {
        let name = self.versioned_name(tier);
        debug!(tier = %name, "opening tier");
        self.backend.open(&name)
    }

    /// All physical tier names known to the backend, across generations.
    pub fn names(&self) -> Vec<String> {
        self.backend.names()
    }

    /// Delete a physical tier by name.
    pub fn delete(&self, physical_name: &str) -> Result<(), StoreError> {
        info!(tier = %physical_name, "deleting obsolete tier");
        self.backend.delete(physical_name)
    }

    /// The expected physical tier names for this generation.
    pub fn expected_names(&self) -> Vec<String> {
        [STATIC_TIER, DYNAMIC_TIER, IMAGE_TIER]
            .iter()
            .map(|t| self.versioned_name(t))
            .collect()
    }

    /// The generation version suffix.
    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ResponseSnapshot;
    use tempfile::TempDir;

    #[test]
    fn test_versioned_name() {
        let registry = TierRegistry::new(Arc::new(MemoryBackend::new()), "3.0");
        assert_eq!(registry.versioned_name(STATIC_TIER), "static-v3.0");
        assert_eq!(registry.versioned_name(IMAGE_TIER), "images-v3.0");
    }

    #[test]
    fn test_open_returns_same_store() {
        let registry = TierRegistry::new(Arc::new(MemoryBackend::new()), "1.0");

        let a = registry.open(STATIC_TIER).unwrap();
        a.put("k", ResponseSnapshot::ok_with_body("v")).unwrap();

        let b = registry.open(STATIC_TIER).unwrap();
        assert!(b.contains("k"));
    }

    #[test]
    fn test_names_spans_generations() {
        let backend = Arc::new(MemoryBackend::new());

        let old = TierRegistry::new(backend.clone(), "1.0");
        old.open(STATIC_TIER).unwrap();

        let new = TierRegistry::new(backend.clone(), "2.0");
        new.open(STATIC_TIER).unwrap();

        let mut names = new.names();
        names.sort();
        assert_eq!(names, vec!["static-v1.0", "static-v2.0"]);
    }

    #[test]
    fn test_delete_removes_tier() {
        let backend = Arc::new(MemoryBackend::new());
        let registry = TierRegistry::new(backend, "1.0");

        registry.open(DYNAMIC_TIER).unwrap();
        registry.delete("dynamic-v1.0").unwrap();

        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_expected_names_covers_all_tiers() {
        let registry = TierRegistry::new(Arc::new(MemoryBackend::new()), "2.0");
        let expected = registry.expected_names();

        assert_eq!(expected.len(), 3);
        assert!(expected.contains(&"static-v2.0".to_string()));
        assert!(expected.contains(&"dynamic-v2.0".to_string()));
        assert!(expected.contains(&"images-v2.0".to_string()));
    }

    #[test]
    fn test_fs_backend_tiers_visible_after_reopen() {
        let temp = TempDir::new().unwrap();

        {
            let backend = FsBackend::new(temp.path()).unwrap();
            let store = backend.open("static-v1.0").unwrap();
            store.put("k", ResponseSnapshot::ok_with_body("v")).unwrap();
        }

        let backend = FsBackend::new(temp.path()).unwrap();
        assert_eq!(backend.names(), vec!["static-v1.0"]);

        let store = backend.open("static-v1.0").unwrap();
        assert_eq!(&store.get("k").unwrap().body[..], b"v");
    }

    #[test]
    fn test_fs_backend_delete_removes_directory() {
        let temp = TempDir::new().unwrap();
        let backend = FsBackend::new(temp.path()).unwrap();

        let store = backend.open("images-v1.0").unwrap();
        store.put("k", ResponseSnapshot::ok_with_body("v")).unwrap();

        backend.delete("images-v1.0").unwrap();
        assert!(backend.names().is_empty());
        assert!(!temp.path().join("images-v1.0").exists());
    }

    #[test]
    fn test_fs_backend_delete_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        let backend = FsBackend::new(temp.path()).unwrap();
        assert!(backend.delete("never-existed").is_ok());
    }
}

//! Ordered key-value stores for cached response snapshots.
//!
//! Provides the [`EntryStore`] abstraction plus in-memory and
//! filesystem-backed implementations. Stores enumerate keys in insertion
//! order, which the eviction policy depends on.

mod fs;
mod memory;
mod r#trait;
mod types;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use r#trait::EntryStore;
pub use types::StoreError;

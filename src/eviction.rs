//! Bounded-tier eviction policy.
//!
//! Each bounded tier carries a maximum entry count. When the tier is at or
//! above that maximum just before an insert, the oldest 20% of entries
//! (rounded up) are evicted as one batch, so a completed write never
//! leaves the tier above its maximum and the size never transiently
//! exceeds maximum+1. Batch eviction amortizes the key scan.
//!
//! Recency is approximated by insertion order: the store tracks when keys
//! were inserted, not when they were last read. That approximation is
//! intentional and must be preserved.

use crate::store::{EntryStore, StoreError};
use tracing::{debug, trace};

/// Fraction of the tier evicted per batch, as a divisor (1/5 = 20%).
const EVICT_DIVISOR: usize = 5;

/// Evict the oldest batch of entries if the tier is at capacity.
///
/// Call immediately before inserting into a bounded tier. When the current
/// entry count is below `max_entries` this is a no-op returning 0.
///
/// # Arguments
///
/// * `store` - The bounded tier
/// * `max_entries` - Configured maximum entry count for the tier
///
/// # Returns
///
/// The number of entries evicted.
pub fn evict_for_insert(store: &dyn EntryStore, max_entries: usize) -> Result<usize, StoreError> {
    let len = store.len();
    if len < max_entries {
        trace!(len, max_entries, "tier below threshold, eviction noop");
        return Ok(0);
    }

    // Oldest ⌈20%⌉ of current entries, as one batch
    let batch = len.div_ceil(EVICT_DIVISOR);
    let keys = store.keys();

    let mut evicted = 0;
    for key in keys.iter().take(batch) {
        if store.delete(key)? {
            evicted += 1;
        }
    }

    debug!(evicted, len, max_entries, "evicted oldest entries from bounded tier");
    Ok(evicted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ResponseSnapshot;
    use crate::store::MemoryStore;

    fn fill(store: &MemoryStore, count: usize) {
        for i in 1..=count {
            store
                .put(&format!("key-{:03}", i), ResponseSnapshot::ok_with_body("x"))
                .unwrap();
        }
    }

    #[test]
    fn test_noop_below_threshold() {
        let store = MemoryStore::new();
        fill(&store, 29);

        let evicted = evict_for_insert(&store, 30).unwrap();

        assert_eq!(evicted, 0);
        assert_eq!(store.len(), 29);
    }

    #[test]
    fn test_evicts_oldest_batch_at_threshold() {
        let store = MemoryStore::new();
        fill(&store, 30);

        let evicted = evict_for_insert(&store, 30).unwrap();

        // ⌈0.2 * 30⌉ = 6 oldest entries removed
        assert_eq!(evicted, 6);
        assert_eq!(store.len(), 24);

        let keys = store.keys();
        assert_eq!(keys.first().unwrap(), "key-007");
        for i in 1..=6 {
            assert!(!store.contains(&format!("key-{:03}", i)));
        }
    }

    #[test]
    fn test_bounded_insert_scenario() {
        // Insert keys 1..31 with max 30: after the 30th insert size is 30;
        // the 31st insert first evicts keys 1-6, then inserts, final size 25
        // holding keys {7..31}.
        let store = MemoryStore::new();
        let max = 30;

        for i in 1..=31 {
            evict_for_insert(&store, max).unwrap();
            store
                .put(&format!("key-{:03}", i), ResponseSnapshot::ok_with_body("x"))
                .unwrap();
            assert!(store.len() <= max, "size must never exceed max after a write");
        }

        assert_eq!(store.len(), 25);
        let keys = store.keys();
        assert_eq!(keys.first().unwrap(), "key-007");
        assert_eq!(keys.last().unwrap(), "key-031");
    }

    #[test]
    fn test_size_never_exceeds_max_over_long_run() {
        let store = MemoryStore::new();
        let max = 10;

        for i in 1..=100 {
            evict_for_insert(&store, max).unwrap();
            store
                .put(&format!("key-{:03}", i), ResponseSnapshot::ok_with_body("x"))
                .unwrap();
            assert!(store.len() <= max);
        }
    }

    #[test]
    fn test_small_tier_batch_rounds_up() {
        let store = MemoryStore::new();
        fill(&store, 3);

        // ⌈0.2 * 3⌉ = 1
        let evicted = evict_for_insert(&store, 3).unwrap();
        assert_eq!(evicted, 1);
        assert!(!store.contains("key-001"));
    }
}

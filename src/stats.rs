//! Agent statistics tracking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters covering the agent's request handling.
///
/// All counters are atomic; the struct is shared across concurrent
/// handlers behind an `Arc`.
#[derive(Debug, Default)]
pub struct AgentStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    network_fetches: AtomicU64,
    fetch_failures: AtomicU64,
    evictions: AtomicU64,
    background_refreshes: AtomicU64,
    passthroughs: AtomicU64,
}

impl AgentStats {
    /// Create zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_fetch(&self) {
        self.network_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_background_refresh(&self) {
        self.background_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_passthrough(&self) {
        self.passthroughs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn network_fetches(&self) -> u64 {
        self.network_fetches.load(Ordering::Relaxed)
    }

    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn background_refreshes(&self) -> u64 {
        self.background_refreshes.load(Ordering::Relaxed)
    }

    pub fn passthroughs(&self) -> u64 {
        self.passthroughs.load(Ordering::Relaxed)
    }

    /// Cache hit rate over all classified lookups (0.0 if none yet).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.cache_hits() as f64;
        let total = hits + self.cache_misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = AgentStats::new();
        assert_eq!(stats.cache_hits(), 0);
        assert_eq!(stats.cache_misses(), 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let stats = AgentStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_eviction_batch_counting() {
        let stats = AgentStats::new();
        stats.record_evictions(6);
        stats.record_evictions(6);
        assert_eq!(stats.evictions(), 12);
    }
}

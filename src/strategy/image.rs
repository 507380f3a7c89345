//! Bounded image strategy: cache-first with pre-insert eviction.
//!
//! Serves both gallery images (dedicated bounded tier) and generic images
//! (bounded share of the dynamic tier). On a successful fetch the eviction
//! pass runs before the store, so the tier never exceeds its maximum after
//! a completed write. Failures yield an empty placeholder, never the raw
//! network error.

use super::StrategyContext;
use crate::eviction::evict_for_insert;
use crate::net::Fetcher;
use crate::request::{Request, ResponseSnapshot};
use crate::store::EntryStore;
use std::sync::Arc;
use tracing::{debug, warn};

pub async fn handle<F: Fetcher>(
    ctx: &StrategyContext<F>,
    tier: &Arc<dyn EntryStore>,
    max_entries: usize,
    request: &Request,
) -> ResponseSnapshot {
    let key = request.key();

    if let Some(cached) = tier.get(&key) {
        ctx.stats.record_hit();
        debug!(url = %request.url, "image served from cache");
        return cached;
    }

    ctx.stats.record_miss();
    ctx.stats.record_network_fetch();

    match ctx.fetcher.fetch(request).await {
        Ok(snapshot) => {
            if snapshot.ok {
                // Eviction precedes its paired insert
                match evict_for_insert(tier.as_ref(), max_entries) {
                    Ok(evicted) => ctx.stats.record_evictions(evicted as u64),
                    Err(e) => warn!(url = %request.url, error = %e, "eviction pass failed"),
                }
                if let Err(e) = tier.put(&key, snapshot.clone()) {
                    warn!(url = %request.url, error = %e, "failed to cache image");
                }
            }
            snapshot
        }
        Err(e) => {
            ctx.stats.record_fetch_failure();
            warn!(url = %request.url, error = %e, "image fetch failed");
            ResponseSnapshot::not_found()
        }
    }
}

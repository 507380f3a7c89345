//! Document strategy: cache-first with background refresh.
//!
//! A cached document is returned immediately while a detached task
//! re-fetches it and overwrites the tier (stale-while-revalidate). The
//! triggering request cannot observe the refresh; only subsequent
//! requests see the updated content.

use super::StrategyContext;
use crate::net::Fetcher;
use crate::request::{Request, ResponseSnapshot};
use std::sync::Arc;
use tracing::{debug, warn};

pub async fn handle<F>(ctx: &StrategyContext<F>, request: &Request) -> ResponseSnapshot
where
    F: Fetcher + Send + Sync + 'static,
{
    let key = request.key();

    if let Some(cached) = ctx.static_tier.get(&key) {
        ctx.stats.record_hit();
        debug!(url = %request.url, "document served from cache, refreshing in background");
        spawn_refresh(ctx, request.clone());
        return cached;
    }

    ctx.stats.record_miss();
    ctx.stats.record_network_fetch();

    match ctx.fetcher.fetch(request).await {
        Ok(snapshot) => {
            if snapshot.ok {
                if let Err(e) = ctx.static_tier.put(&key, snapshot.clone()) {
                    warn!(url = %request.url, error = %e, "failed to cache document");
                }
            }
            snapshot
        }
        Err(e) => {
            ctx.stats.record_fetch_failure();
            warn!(url = %request.url, error = %e, "document fetch failed, using offline fallback");

            match ctx.static_tier.get(&ctx.offline_fallback_key) {
                Some(fallback) => fallback,
                None => ResponseSnapshot::offline(),
            }
        }
    }
}

/// Fire-and-forget refresh of a cached document.
///
/// Spawned without a join point; errors are logged and otherwise dropped.
fn spawn_refresh<F>(ctx: &StrategyContext<F>, request: Request)
where
    F: Fetcher + Send + Sync + 'static,
{
    let store = Arc::clone(&ctx.static_tier);
    let fetcher = Arc::clone(&ctx.fetcher);
    let stats = Arc::clone(&ctx.stats);

    tokio::spawn(async move {
        match fetcher.fetch(&request).await {
            Ok(fresh) if fresh.ok => {
                if store.put(&request.key(), fresh).is_ok() {
                    stats.record_background_refresh();
                }
            }
            Ok(fresh) => {
                debug!(url = %request.url, status = fresh.status, "background refresh skipped");
            }
            Err(e) => {
                debug!(url = %request.url, error = %e, "background refresh failed");
            }
        }
    });
}

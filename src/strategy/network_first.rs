//! Default strategy: network-first with cache fallback.

use super::StrategyContext;
use crate::net::Fetcher;
use crate::request::{Request, ResponseSnapshot};
use tracing::{debug, warn};

pub async fn handle<F: Fetcher>(ctx: &StrategyContext<F>, request: &Request) -> ResponseSnapshot {
    let key = request.key();

    ctx.stats.record_network_fetch();

    match ctx.fetcher.fetch(request).await {
        Ok(snapshot) => {
            if snapshot.ok {
                if let Err(e) = ctx.dynamic_tier.put(&key, snapshot.clone()) {
                    warn!(url = %request.url, error = %e, "failed to cache response");
                }
            }
            snapshot
        }
        Err(e) => {
            ctx.stats.record_fetch_failure();
            debug!(url = %request.url, error = %e, "network-first fetch failed, trying cache");

            match ctx.dynamic_tier.get(&key) {
                Some(cached) => {
                    ctx.stats.record_hit();
                    cached
                }
                None => {
                    ctx.stats.record_miss();
                    ResponseSnapshot::not_found()
                }
            }
        }
    }
}

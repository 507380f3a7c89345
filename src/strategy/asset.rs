//! Static asset strategy: cache-first.

use super::StrategyContext;
use crate::net::Fetcher;
use crate::request::{Request, ResponseSnapshot};
use tracing::{debug, warn};

pub async fn handle<F: Fetcher>(ctx: &StrategyContext<F>, request: &Request) -> ResponseSnapshot {
    let key = request.key();

    if let Some(cached) = ctx.static_tier.get(&key) {
        ctx.stats.record_hit();
        debug!(url = %request.url, "asset served from cache");
        return cached;
    }

    ctx.stats.record_miss();
    ctx.stats.record_network_fetch();

    match ctx.fetcher.fetch(request).await {
        Ok(snapshot) => {
            if snapshot.ok {
                if let Err(e) = ctx.static_tier.put(&key, snapshot.clone()) {
                    warn!(url = %request.url, error = %e, "failed to cache asset");
                }
            }
            snapshot
        }
        Err(e) => {
            ctx.stats.record_fetch_failure();
            warn!(url = %request.url, error = %e, "asset fetch failed");
            ResponseSnapshot::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, request};
    use super::*;
    use crate::request::ResourceKind;

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let ctx = context();
        ctx.fetcher
            .respond("https://example.com/css/site.min.css", "body{}");

        let req = request("/css/site.min.css", ResourceKind::Style);
        let resp = handle(&ctx, &req).await;

        assert_eq!(&resp.body[..], b"body{}");
        assert!(ctx.static_tier.contains("https://example.com/css/site.min.css"));
    }

    #[tokio::test]
    async fn test_hit_does_not_touch_network() {
        let ctx = context();
        ctx.static_tier
            .put(
                "https://example.com/js/app.min.js",
                ResponseSnapshot::ok_with_body("console.log(1)"),
            )
            .unwrap();

        let req = request("/js/app.min.js", ResourceKind::Script);
        let resp = handle(&ctx, &req).await;

        assert_eq!(&resp.body[..], b"console.log(1)");
        assert_eq!(ctx.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_returns_typed_unavailable() {
        let ctx = context();

        let req = request("/css/missing.css", ResourceKind::Style);
        let resp = handle(&ctx, &req).await;

        assert_eq!(resp.status, 503);
        assert!(resp.body.is_empty());
    }
}

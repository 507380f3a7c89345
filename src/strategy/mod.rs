//! Per-class caching strategies.
//!
//! Each request class maps to exactly one handler. Handlers always resolve
//! to a response snapshot; network and store failures are converted into
//! the strategy's defined fallback and never propagate to the caller. A
//! handler performs at most one network attempt on its resolution path;
//! the document strategy's background refresh is a detached task whose
//! completion is observable only by subsequent requests.

mod asset;
mod document;
mod image;
mod network_first;

use crate::classify::RequestClass;
use crate::net::Fetcher;
use crate::request::{Request, ResponseSnapshot};
use crate::stats::AgentStats;
use crate::store::EntryStore;
use std::sync::Arc;

/// Shared state handed to every strategy handler.
pub struct StrategyContext<F: Fetcher> {
    /// Tier holding critical documents and static assets.
    pub static_tier: Arc<dyn EntryStore>,
    /// Tier holding network-first responses and generic images.
    pub dynamic_tier: Arc<dyn EntryStore>,
    /// Bounded tier holding gallery images.
    pub image_tier: Arc<dyn EntryStore>,
    /// Network fetcher.
    pub fetcher: Arc<F>,
    /// Shared statistics.
    pub stats: Arc<AgentStats>,
    /// Entry limit for the gallery tier.
    pub gallery_max_entries: usize,
    /// Entry limit enforced for generic images in the dynamic tier.
    pub image_max_entries: usize,
    /// Cache key of the offline fallback document.
    pub offline_fallback_key: String,
}

/// Dispatch a classified request to its strategy handler.
pub async fn dispatch<F>(
    ctx: &StrategyContext<F>,
    class: RequestClass,
    request: &Request,
) -> ResponseSnapshot
where
    F: Fetcher + Send + Sync + 'static,
{
    match class {
        RequestClass::Document => document::handle(ctx, request).await,
        RequestClass::StaticAsset => asset::handle(ctx, request).await,
        RequestClass::GalleryImage => {
            let tier = Arc::clone(&ctx.image_tier);
            image::handle(ctx, &tier, ctx.gallery_max_entries, request).await
        }
        RequestClass::GenericImage => {
            let tier = Arc::clone(&ctx.dynamic_tier);
            image::handle(ctx, &tier, ctx.image_max_entries, request).await
        }
        RequestClass::Default => network_first::handle(ctx, request).await,
    }
}

//! Agent lifecycle: install and activate.
//!
//! Install atomically pre-populates the critical tier; a generation whose
//! install fails never becomes active, and a previously active generation
//! keeps serving. Activate garbage-collects tiers from prior generations
//! and then pre-warms a bounded slice of the essential manifest. Cleanup
//! completes before activation returns, which is the only cross-phase
//! ordering the agent depends on: a generation must not begin claiming
//! application instances until old tiers are gone.

use crate::config::AgentConfig;
use crate::net::Fetcher;
use crate::registry::{TierRegistry, DYNAMIC_TIER, IMAGE_TIER, STATIC_TIER};
use crate::request::{Request, ResourceKind, ResponseSnapshot};
use crate::store::StoreError;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Lifecycle errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A critical manifest resource could not be fetched; install aborts
    /// with nothing persisted
    #[error("install failed: critical resource {url} unavailable: {reason}")]
    CriticalResource { url: String, reason: String },

    /// A manifest path did not resolve against the configured origin
    #[error("invalid manifest path {path}: {reason}")]
    ManifestPath { path: String, reason: String },

    /// Store failure while persisting or cleaning tiers
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a successful activation.
#[derive(Debug)]
pub struct ActivateReport {
    /// Physical names of tiers deleted by the cleanup pass.
    pub deleted: Vec<String>,
    /// Number of essential resources pre-warmed into the dynamic tier.
    pub prewarmed: usize,
}

fn manifest_request(config: &AgentConfig, path: &str) -> Result<Request, LifecycleError> {
    let url = config
        .resolve(path)
        .map_err(|e| LifecycleError::ManifestPath {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    Ok(Request::get(url, ResourceKind::Other))
}

/// Run the install phase for a new generation.
///
/// Opens the configured tier set, then populates the static tier from the
/// critical manifest with all-or-nothing semantics: every resource is
/// fetched first, and snapshots are persisted only once the whole batch
/// has succeeded. A transport failure or non-2xx status for any single
/// resource fails the install with zero writes.
pub async fn install<F: Fetcher>(
    config: &AgentConfig,
    registry: &TierRegistry,
    fetcher: &F,
) -> Result<(), LifecycleError> {
    let static_tier = registry.open(STATIC_TIER)?;
    registry.open(DYNAMIC_TIER)?;
    registry.open(IMAGE_TIER)?;

    // Fetch the whole batch before persisting anything
    let mut batch: Vec<(String, ResponseSnapshot)> = Vec::new();
    for path in &config.critical_resources {
        let request = manifest_request(config, path)?;
        let key = request.key();

        match fetcher.fetch(&request).await {
            Ok(snapshot) if snapshot.ok => {
                batch.push((key, snapshot));
            }
            Ok(snapshot) => {
                return Err(LifecycleError::CriticalResource {
                    url: key,
                    reason: format!("HTTP {}", snapshot.status),
                });
            }
            Err(e) => {
                return Err(LifecycleError::CriticalResource {
                    url: key,
                    reason: e.to_string(),
                });
            }
        }
    }

    for (key, snapshot) in batch {
        static_tier.put(&key, snapshot)?;
    }

    info!(
        version = registry.version(),
        critical = config.critical_resources.len(),
        "install complete"
    );
    Ok(())
}

/// Run the activate phase for an installed generation.
///
/// Deletes every tier whose physical name is absent from `expected`, then
/// pre-warms the dynamic tier from the essential manifest, capped at the
/// configured limit so a long resource list cannot block activation.
/// Pre-warm is best-effort; individual fetch failures are logged and
/// skipped.
pub async fn activate<F: Fetcher>(
    config: &AgentConfig,
    registry: &TierRegistry,
    fetcher: &F,
    expected: &[String],
) -> Result<ActivateReport, LifecycleError> {
    // Cleanup must fully complete before the generation starts claiming
    let mut deleted = Vec::new();
    for name in registry.names() {
        if !expected.contains(&name) {
            registry.delete(&name)?;
            deleted.push(name);
        }
    }

    let dynamic_tier = registry.open(DYNAMIC_TIER)?;
    let mut prewarmed = 0;
    for path in config.essential_resources.iter().take(config.prewarm_limit) {
        let request = manifest_request(config, path)?;
        let key = request.key();

        match fetcher.fetch(&request).await {
            Ok(snapshot) if snapshot.ok => {
                dynamic_tier.put(&key, snapshot)?;
                prewarmed += 1;
            }
            Ok(snapshot) => {
                debug!(url = %key, status = snapshot.status, "prewarm skipped resource");
            }
            Err(e) => {
                warn!(url = %key, error = %e, "prewarm fetch failed");
            }
        }
    }

    info!(
        version = registry.version(),
        deleted = deleted.len(),
        prewarmed,
        "activation complete"
    );
    Ok(ActivateReport { deleted, prewarmed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::MockFetcher;
    use crate::registry::MemoryBackend;
    use std::sync::Arc;
    use url::Url;

    fn config() -> AgentConfig {
        AgentConfig::new(Url::parse("https://example.com").unwrap(), "2.0")
            .with_critical_resources(vec![
                "/".into(),
                "/index.html".into(),
                "/css/site.min.css".into(),
            ])
            .with_essential_resources(vec![
                "/img/gal-1.webp".into(),
                "/img/gal-2.webp".into(),
                "/img/gal-3.webp".into(),
            ])
            .with_prewarm_limit(2)
    }

    fn registry() -> TierRegistry {
        TierRegistry::new(Arc::new(MemoryBackend::new()), "2.0")
    }

    fn fetcher_with_all(config: &AgentConfig) -> MockFetcher {
        let mock = MockFetcher::offline();
        for path in config
            .critical_resources
            .iter()
            .chain(config.essential_resources.iter())
        {
            let url = config.resolve(path).unwrap();
            mock.respond(url.as_str(), &format!("body-of-{}", path));
        }
        mock
    }

    #[tokio::test]
    async fn test_install_populates_static_tier() {
        let config = config();
        let registry = registry();
        let fetcher = fetcher_with_all(&config);

        install(&config, &registry, &fetcher).await.unwrap();

        let static_tier = registry.open(STATIC_TIER).unwrap();
        assert_eq!(static_tier.len(), 3);
        assert!(static_tier.contains("https://example.com/index.html"));
    }

    #[tokio::test]
    async fn test_install_opens_all_tiers() {
        let config = config();
        let registry = registry();
        let fetcher = fetcher_with_all(&config);

        install(&config, &registry, &fetcher).await.unwrap();

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["dynamic-v2.0", "images-v2.0", "static-v2.0"]);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing_on_transport_failure() {
        let config = config();
        let registry = registry();
        let fetcher = fetcher_with_all(&config);
        fetcher.fail("https://example.com/css/site.min.css");

        let result = install(&config, &registry, &fetcher).await;

        assert!(matches!(
            result,
            Err(LifecycleError::CriticalResource { .. })
        ));
        let static_tier = registry.open(STATIC_TIER).unwrap();
        assert!(static_tier.is_empty(), "no critical resource may persist");
    }

    #[tokio::test]
    async fn test_install_treats_http_error_as_failure() {
        let config = config();
        let registry = registry();
        let fetcher = fetcher_with_all(&config);
        fetcher.respond_with(
            "https://example.com/index.html",
            ResponseSnapshot::new(500, Vec::new(), bytes::Bytes::new()),
        );

        let result = install(&config, &registry, &fetcher).await;

        assert!(result.is_err());
        assert!(registry.open(STATIC_TIER).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activate_deletes_only_unexpected_tiers() {
        let backend = Arc::new(MemoryBackend::new());

        // Old generation with content
        let old = TierRegistry::new(backend.clone(), "1.0");
        old.open(STATIC_TIER).unwrap();
        old.open(DYNAMIC_TIER).unwrap();

        // Current generation with content that must survive
        let current = TierRegistry::new(backend.clone(), "2.0");
        let survivor = current.open(STATIC_TIER).unwrap();
        survivor
            .put("https://example.com/keep", ResponseSnapshot::ok_with_body("keep"))
            .unwrap();

        let config = config().with_essential_resources(Vec::new());
        let fetcher = MockFetcher::offline();

        let report = activate(&config, &current, &fetcher, &current.expected_names())
            .await
            .unwrap();

        let mut deleted = report.deleted.clone();
        deleted.sort();
        assert_eq!(deleted, vec!["dynamic-v1.0", "static-v1.0"]);

        let survivor = current.open(STATIC_TIER).unwrap();
        assert_eq!(
            &survivor.get("https://example.com/keep").unwrap().body[..],
            b"keep"
        );
    }

    #[tokio::test]
    async fn test_activate_prewarm_respects_cap() {
        let config = config(); // 3 essential resources, cap 2
        let registry = registry();
        let fetcher = fetcher_with_all(&config);

        let report = activate(&config, &registry, &fetcher, &registry.expected_names())
            .await
            .unwrap();

        assert_eq!(report.prewarmed, 2);
        assert_eq!(registry.open(DYNAMIC_TIER).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_activate_prewarm_failures_are_not_fatal() {
        let config = config();
        let registry = registry();
        let fetcher = MockFetcher::offline(); // every prewarm fetch fails

        let report = activate(&config, &registry, &fetcher, &registry.expected_names())
            .await
            .unwrap();

        assert_eq!(report.prewarmed, 0);
        assert!(registry.open(DYNAMIC_TIER).unwrap().is_empty());
    }
}

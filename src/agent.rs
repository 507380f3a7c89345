//! High-level caching agent facade.
//!
//! Ties the registry, classifier, strategies, and lifecycle together for
//! one agent generation. The agent is transparent to its caller: it either
//! answers an intercepted request with a response snapshot or declares it
//! a passthrough, and exposes no other request API.

use crate::classify::{Classifier, RequestClass};
use crate::config::AgentConfig;
use crate::lifecycle::{self, ActivateReport, LifecycleError};
use crate::net::Fetcher;
use crate::registry::{StoreBackend, TierRegistry, DYNAMIC_TIER, IMAGE_TIER, STATIC_TIER};
use crate::request::{Request, ResponseSnapshot};
use crate::stats::AgentStats;
use crate::store::StoreError;
use crate::strategy::{self, StrategyContext};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Agent errors.
///
/// Per-request network failures and cache misses never surface here; they
/// are resolved inside the strategy handlers. These errors cover lifecycle
/// and configuration only.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Gallery pattern failed to compile
    #[error("invalid gallery pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration value could not be used
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Install or activate failed
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Store failure outside a strategy handler
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Activate was called before install completed
    #[error("install has not completed for this generation")]
    NotInstalled,

    /// A request arrived before the generation became active
    #[error("agent generation is not active")]
    NotActive,
}

/// Result of handling one intercepted request.
#[derive(Debug)]
pub enum AgentResponse {
    /// The agent answered the request.
    Handled(ResponseSnapshot),
    /// Non-cacheable request; the caller must forward it untouched.
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    New,
    Installed,
    Active,
}

/// One generation of the caching agent.
///
/// # Example
///
/// ```ignore
/// use cachelayer::agent::CacheAgent;
/// use cachelayer::config::AgentConfig;
/// use cachelayer::net::ReqwestFetcher;
/// use cachelayer::registry::MemoryBackend;
/// use std::sync::Arc;
///
/// let config = AgentConfig::new(origin, "3.0")
///     .with_critical_resources(vec!["/".into(), "/index.html".into()]);
/// let mut agent = CacheAgent::new(config, Arc::new(MemoryBackend::new()), ReqwestFetcher::new()?)?;
///
/// agent.install().await?;
/// agent.activate().await?;
/// let response = agent.handle(&request).await?;
/// ```
pub struct CacheAgent<F: Fetcher> {
    config: AgentConfig,
    registry: TierRegistry,
    classifier: Classifier,
    fetcher: Arc<F>,
    stats: Arc<AgentStats>,
    ctx: Option<StrategyContext<F>>,
    phase: Phase,
}

impl<F> CacheAgent<F>
where
    F: Fetcher + Send + Sync + 'static,
{
    /// Create a new, not-yet-installed agent generation.
    ///
    /// # Arguments
    ///
    /// * `config` - Static configuration for this generation
    /// * `backend` - Store backend shared across generations
    /// * `fetcher` - Network fetcher
    pub fn new(
        config: AgentConfig,
        backend: Arc<dyn StoreBackend>,
        fetcher: F,
    ) -> Result<Self, AgentError> {
        let classifier = Classifier::new(&config.gallery_pattern)?;
        let registry = TierRegistry::new(backend, config.version.clone());

        // Resolve the fallback path early so a bad config fails fast
        config
            .resolve(&config.offline_fallback)
            .map_err(|e| AgentError::Config(format!("offline fallback path: {}", e)))?;

        Ok(Self {
            config,
            registry,
            classifier,
            fetcher: Arc::new(fetcher),
            stats: Arc::new(AgentStats::new()),
            ctx: None,
            phase: Phase::New,
        })
    }

    /// Run the install phase.
    ///
    /// On failure nothing is persisted and the generation stays inactive;
    /// a previously active generation keeps serving from its own tiers.
    pub async fn install(&mut self) -> Result<(), AgentError> {
        lifecycle::install(&self.config, &self.registry, self.fetcher.as_ref()).await?;

        let offline_fallback_key = self
            .config
            .resolve(&self.config.offline_fallback)
            .map_err(|e| AgentError::Config(format!("offline fallback path: {}", e)))?
            .as_str()
            .to_string();

        self.ctx = Some(StrategyContext {
            static_tier: self.registry.open(STATIC_TIER)?,
            dynamic_tier: self.registry.open(DYNAMIC_TIER)?,
            image_tier: self.registry.open(IMAGE_TIER)?,
            fetcher: Arc::clone(&self.fetcher),
            stats: Arc::clone(&self.stats),
            gallery_max_entries: self.config.gallery_max_entries,
            image_max_entries: self.config.image_max_entries,
            offline_fallback_key,
        });
        self.phase = Phase::Installed;
        Ok(())
    }

    /// Run the activate phase.
    ///
    /// Old-generation tiers are deleted before this returns, so callers
    /// may start routing requests to the agent as soon as it resolves.
    pub async fn activate(&mut self) -> Result<ActivateReport, AgentError> {
        if self.phase == Phase::New {
            return Err(AgentError::NotInstalled);
        }

        let expected = self.registry.expected_names();
        let report =
            lifecycle::activate(&self.config, &self.registry, self.fetcher.as_ref(), &expected)
                .await?;

        self.phase = Phase::Active;
        info!(version = %self.config.version, "agent generation active");
        Ok(report)
    }

    /// Handle one intercepted request.
    ///
    /// Requests are handled independently and concurrently; the agent
    /// takes no cross-request lock. Two concurrent misses for the same
    /// key may both fetch and both store, last write wins.
    pub async fn handle(&self, request: &Request) -> Result<AgentResponse, AgentError> {
        let ctx = match (&self.ctx, self.phase) {
            (Some(ctx), Phase::Active) => ctx,
            _ => return Err(AgentError::NotActive),
        };

        if !request.is_cacheable(&self.config.origin) {
            self.stats.record_passthrough();
            debug!(method = %request.method, url = %request.url, "passthrough");
            return Ok(AgentResponse::Passthrough);
        }

        let class = self.classifier.classify(request);
        let response = strategy::dispatch(ctx, class, request).await;
        Ok(AgentResponse::Handled(response))
    }

    /// Classify a request without handling it.
    pub fn classify(&self, request: &Request) -> RequestClass {
        self.classifier.classify(request)
    }

    /// Shared statistics for this generation.
    pub fn stats(&self) -> Arc<AgentStats> {
        Arc::clone(&self.stats)
    }

    /// This generation's version.
    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// Whether the generation has completed activation.
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }
}

//! Agent configuration.
//!
//! Static data consumed at install and activate: the resource manifests,
//! the gallery classification pattern, and per-tier entry limits.

use url::Url;

/// Default gallery image path pattern.
pub const DEFAULT_GALLERY_PATTERN: &str = r"/img/image_\d+\.webp$";

/// Default maximum entry count for the gallery image tier.
pub const DEFAULT_GALLERY_MAX_ENTRIES: usize = 50;

/// Default maximum entry count applied to generic images in the dynamic tier.
pub const DEFAULT_IMAGE_MAX_ENTRIES: usize = 30;

/// Default cap on essential resources pre-warmed during activation.
pub const DEFAULT_PREWARM_LIMIT: usize = 5;

/// Configuration for one agent generation.
///
/// # Example
///
/// ```
/// use cachelayer::config::AgentConfig;
/// use url::Url;
///
/// let origin = Url::parse("https://example.com").unwrap();
/// let config = AgentConfig::new(origin, "3.0")
///     .with_critical_resources(vec!["/".into(), "/index.html".into()])
///     .with_essential_resources(vec!["/img/gal-1.webp".into()])
///     .with_gallery_max_entries(50);
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Origin this agent serves; only same-origin requests are intercepted.
    pub origin: Url,
    /// Generation version, used as the tier name suffix.
    pub version: String,
    /// Resources that must all be cached atomically at install.
    pub critical_resources: Vec<String>,
    /// Resources pre-warmed best-effort at activate.
    pub essential_resources: Vec<String>,
    /// Regex matched against URL paths to detect gallery images.
    pub gallery_pattern: String,
    /// Maximum entry count for the gallery image tier.
    pub gallery_max_entries: usize,
    /// Maximum entry count enforced for generic images in the dynamic tier.
    pub image_max_entries: usize,
    /// Maximum number of essential resources fetched during activation.
    pub prewarm_limit: usize,
    /// Path of the document served as offline fallback.
    pub offline_fallback: String,
}

impl AgentConfig {
    /// Create a configuration for the given origin and generation version.
    pub fn new(origin: Url, version: impl Into<String>) -> Self {
        Self {
            origin,
            version: version.into(),
            critical_resources: Vec::new(),
            essential_resources: Vec::new(),
            gallery_pattern: DEFAULT_GALLERY_PATTERN.to_string(),
            gallery_max_entries: DEFAULT_GALLERY_MAX_ENTRIES,
            image_max_entries: DEFAULT_IMAGE_MAX_ENTRIES,
            prewarm_limit: DEFAULT_PREWARM_LIMIT,
            offline_fallback: "/index.html".to_string(),
        }
    }

    /// Set the critical resource manifest.
    pub fn with_critical_resources(mut self, resources: Vec<String>) -> Self {
        self.critical_resources = resources;
        self
    }

    /// Set the essential resource manifest.
    pub fn with_essential_resources(mut self, resources: Vec<String>) -> Self {
        self.essential_resources = resources;
        self
    }

    /// Set the gallery image path pattern.
    pub fn with_gallery_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.gallery_pattern = pattern.into();
        self
    }

    /// Set the gallery tier entry limit.
    pub fn with_gallery_max_entries(mut self, max: usize) -> Self {
        self.gallery_max_entries = max;
        self
    }

    /// Set the generic image entry limit.
    pub fn with_image_max_entries(mut self, max: usize) -> Self {
        self.image_max_entries = max;
        self
    }

    /// Set the activation pre-warm cap.
    pub fn with_prewarm_limit(mut self, limit: usize) -> Self {
        self.prewarm_limit = limit;
        self
    }

    /// Set the offline fallback document path.
    pub fn with_offline_fallback(mut self, path: impl Into<String>) -> Self {
        self.offline_fallback = path.into();
        self
    }

    /// Resolve a manifest path against the configured origin.
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.origin.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::new(origin(), "3.0");

        assert_eq!(config.version, "3.0");
        assert_eq!(config.gallery_max_entries, 50);
        assert_eq!(config.image_max_entries, 30);
        assert_eq!(config.prewarm_limit, 5);
        assert_eq!(config.offline_fallback, "/index.html");
        assert!(config.critical_resources.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = AgentConfig::new(origin(), "1.0")
            .with_critical_resources(vec!["/".into(), "/css/site.css".into()])
            .with_essential_resources(vec!["/img/gal-1.webp".into()])
            .with_gallery_max_entries(10)
            .with_image_max_entries(5)
            .with_prewarm_limit(2)
            .with_offline_fallback("/offline.html");

        assert_eq!(config.critical_resources.len(), 2);
        assert_eq!(config.essential_resources.len(), 1);
        assert_eq!(config.gallery_max_entries, 10);
        assert_eq!(config.image_max_entries, 5);
        assert_eq!(config.prewarm_limit, 2);
        assert_eq!(config.offline_fallback, "/offline.html");
    }

    #[test]
    fn test_resolve_joins_origin() {
        let config = AgentConfig::new(origin(), "1.0");
        let url = config.resolve("/img/logo.webp").unwrap();
        assert_eq!(url.as_str(), "https://example.com/img/logo.webp");
    }
}

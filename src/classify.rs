//! Request classification.
//!
//! Maps each intercepted same-origin GET request to exactly one of a
//! closed set of classes. Classification is total and pure: no side
//! effects, no network access.

use crate::request::{Request, ResourceKind};
use regex::Regex;

/// The closed set of request classes, each mapped to one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// HTML document navigation (cache-first with background refresh).
    Document,
    /// Stylesheet or script (cache-first).
    StaticAsset,
    /// Image matching the reserved gallery path pattern (bounded tier).
    GalleryImage,
    /// Any other image (bounded dynamic tier).
    GenericImage,
    /// Everything else (network-first).
    Default,
}

/// Classifies requests by URL pattern and resource kind.
pub struct Classifier {
    gallery_pattern: Regex,
}

impl Classifier {
    /// Create a classifier with the given gallery image path pattern.
    ///
    /// # Arguments
    ///
    /// * `gallery_pattern` - Regex matched against the URL path
    pub fn new(gallery_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            gallery_pattern: Regex::new(gallery_pattern)?,
        })
    }

    /// Classify a request into exactly one class.
    ///
    /// The gallery pattern takes precedence over the resource-kind hint,
    /// so a gallery-path image never falls into `GenericImage`.
    pub fn classify(&self, request: &Request) -> RequestClass {
        if self.gallery_pattern.is_match(request.url.path()) {
            return RequestClass::GalleryImage;
        }

        match request.kind {
            ResourceKind::Document => RequestClass::Document,
            ResourceKind::Style | ResourceKind::Script => RequestClass::StaticAsset,
            ResourceKind::Image => RequestClass::GenericImage,
            ResourceKind::Other => RequestClass::Default,
        }
    }
}

//! Push notification delivery.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Push payload as delivered by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
}

/// Push delivery errors.
#[derive(Debug, Error)]
pub enum PushError {
    /// Payload was not valid JSON or missed required fields
    #[error("invalid push payload: {0}")]
    InvalidPayload(String),

    /// Host notifier refused or failed to render
    #[error("notification failed: {0}")]
    Notify(String),
}

/// Host-provided notification surface.
pub trait Notifier: Send + Sync {
    /// Render a notification.
    fn show(&self, title: &str, body: &str) -> Result<(), PushError>;

    /// Open the application at the given URL in response to a click.
    fn open(&self, url: &str) -> Result<(), PushError>;
}

/// Best-effort push delivery.
///
/// Parses opaque payload bytes, renders a notification, and opens the
/// application root on user interaction. No internal retry: a failed
/// delivery is logged and dropped.
pub struct PushDelivery {
    notifier: Arc<dyn Notifier>,
    root: Url,
}

impl PushDelivery {
    /// Create a delivery channel over the host notifier.
    ///
    /// # Arguments
    ///
    /// * `notifier` - Host notification surface
    /// * `root` - Application root opened on notification click
    pub fn new(notifier: Arc<dyn Notifier>, root: Url) -> Self {
        Self { notifier, root }
    }

    /// Deliver a raw push payload.
    pub fn deliver(&self, payload: &[u8]) -> Result<(), PushError> {
        let payload: PushPayload = serde_json::from_slice(payload)
            .map_err(|e| PushError::InvalidPayload(e.to_string()))?;

        info!(title = %payload.title, "delivering push notification");

        if let Err(e) = self.notifier.show(&payload.title, &payload.body) {
            warn!(error = %e, "push delivery failed, not retrying");
            return Err(e);
        }
        Ok(())
    }

    /// Handle a notification click by opening the application root.
    pub fn clicked(&self) -> Result<(), PushError> {
        info!("notification click received");
        self.notifier.open(self.root.as_str())
    }
}

//! HTTP fetcher abstraction for testability.
//!
//! The [`Fetcher`] trait allows strategy handlers and lifecycle routines
//! to be exercised against a mock network in tests, with
//! [`ReqwestFetcher`] as the real implementation.

use crate::request::{Request, ResponseSnapshot};
use bytes::Bytes;
use std::future::Future;
use thiserror::Error;
use tracing::{trace, warn};

/// Transport-level fetch errors.
///
/// A non-2xx HTTP status is not an error: the fetcher returns the snapshot
/// with `ok == false` and lets the strategy decide. Errors here mean the
/// network attempt itself failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Request could not be completed (DNS, connect, timeout, abort)
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Async network fetcher.
///
/// Implementors perform exactly one network attempt per call; retries are
/// never performed at this layer. An aborted caller simply drops the
/// returned future, abandoning the in-flight request.
pub trait Fetcher: Send + Sync {
    /// Fetch the resource named by `request` from the network.
    fn fetch(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<ResponseSnapshot, FetchError>> + Send;
}

/// Real fetcher backed by a pooled reqwest client.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Create a fetcher with default client configuration.
    ///
    /// No internal timeout is enforced beyond the client defaults; fetch
    /// timing relies on what the host platform provides.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &Request) -> Result<ResponseSnapshot, FetchError> {
        trace!(url = %request.url, method = %request.method, "network fetch starting");

        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| FetchError::Transport(format!("invalid method: {}", e)))?;

        let response = match self
            .client
            .request(method, request.url.clone())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    url = %request.url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "network fetch failed"
                );
                return Err(FetchError::Transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body: Bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        trace!(url = %request.url, status, bytes = body.len(), "network fetch complete");
        Ok(ResponseSnapshot::new(status, headers, body))
    }
}

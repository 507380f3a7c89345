//! cachelayer - Client-side request interception and caching
//!
//! This library sits between an application and the network, intercepting
//! outgoing resource requests and answering them from a set of versioned
//! cache tiers. Each installed agent generation snapshots critical
//! resources up front, serves documents stale-while-revalidate, bounds
//! its image tiers with oldest-first eviction, and falls back to cached
//! content when the network is unreachable.
//!
//! # High-Level API
//!
//! For most use cases, the [`agent`] module provides a simplified facade:
//!
//! ```ignore
//! use cachelayer::agent::CacheAgent;
//! use cachelayer::config::AgentConfig;
//! use cachelayer::net::ReqwestFetcher;
//! use cachelayer::registry::MemoryBackend;
//! use std::sync::Arc;
//!
//! let config = AgentConfig::new(origin, "3.0")
//!     .with_critical_resources(vec!["/".into(), "/index.html".into()]);
//! let mut agent = CacheAgent::new(config, Arc::new(MemoryBackend::new()), ReqwestFetcher::new()?)?;
//!
//! agent.install().await?;
//! agent.activate().await?;
//! let response = agent.handle(&request).await?;
//! ```

pub mod agent;
pub mod background;
pub mod classify;
pub mod config;
pub mod eviction;
pub mod lifecycle;
pub mod logging;
pub mod net;
pub mod registry;
pub mod request;
pub mod stats;
pub mod store;
pub mod strategy;

/// Version of the cachelayer library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Deferred task registry for connectivity-restoration retry.
//!
//! Tasks are registered under a tag (e.g., "contact-form") and invoked
//! when the host platform reports connectivity restored. The handler
//! contract requires idempotence: the host may invoke a task again on a
//! later retry, and re-invocation must not duplicate the underlying
//! effect. Failures are recorded and not retried beyond what the host
//! schedules.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

/// Deferred-sync errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No task registered under the given tag
    #[error("no deferred task registered for tag {0}")]
    NotRegistered(String),

    /// The task itself failed
    #[error("deferred task failed: {0}")]
    TaskFailed(String),
}

/// A deferred task.
///
/// Implementations must be idempotent: running the task twice has the
/// same effect as running it once.
pub trait SyncTask: Send + Sync {
    /// Execute the task once.
    fn run(&self) -> BoxFuture<'_, Result<(), SyncError>>;
}

/// Outcome of a connectivity-restored pass over all registered tasks.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Tasks that completed successfully.
    pub succeeded: usize,
    /// Tasks that failed (logged, not retried here).
    pub failed: usize,
}

/// Registry of named deferred tasks.
pub struct DeferredSyncRegistry {
    tasks: Mutex<HashMap<String, Arc<dyn SyncTask>>>,
}

impl DeferredSyncRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Register a task under `tag`, replacing any previous registration.
    pub fn register(&self, tag: impl Into<String>, task: Arc<dyn SyncTask>) {
        let tag = tag.into();
        info!(tag = %tag, "deferred task registered");
        self.tasks.lock().unwrap().insert(tag, task);
    }

    /// Whether a task is registered under `tag`.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.tasks.lock().unwrap().contains_key(tag)
    }

    /// Run the task registered under `tag`.
    pub async fn run(&self, tag: &str) -> Result<(), SyncError> {
        let task = {
            let tasks = self.tasks.lock().unwrap();
            tasks
                .get(tag)
                .cloned()
                .ok_or_else(|| SyncError::NotRegistered(tag.to_string()))?
        };

        task.run().await
    }

    /// Run every registered task once; called on connectivity restoration.
    ///
    /// Failures are logged and counted but not retried; the host platform
    /// decides whether to schedule another pass.
    pub async fn connectivity_restored(&self) -> SyncReport {
        let tasks: Vec<(String, Arc<dyn SyncTask>)> = {
            let tasks = self.tasks.lock().unwrap();
            tasks.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        let mut report = SyncReport::default();
        for (tag, task) in tasks {
            match task.run().await {
                Ok(()) => {
                    info!(tag = %tag, "deferred task completed");
                    report.succeeded += 1;
                }
                Err(e) => {
                    warn!(tag = %tag, error = %e, "deferred task failed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

impl Default for DeferredSyncRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Background delivery: deferred sync and push notifications.
//!
//! Logically independent of the cache path. Deferred tasks run when the
//! host platform signals restored connectivity; push payloads are
//! rendered best-effort with no internal retry.

mod push;
mod sync;

pub use push::{Notifier, PushDelivery, PushError, PushPayload};
pub use sync::{DeferredSyncRegistry, SyncError, SyncReport, SyncTask};

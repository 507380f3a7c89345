//! Core types for the entry store abstraction.

use thiserror::Error;

/// Store-related errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during store operations
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry file on disk is corrupt or has an unreadable header
    #[error("corrupt entry for key {key}: {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Invalid store configuration
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}

//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or transport error reaching the remote endpoint.
    #[error("network error: {message}")]
    Network {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The remote call did not complete in time.
    #[error("remote request timed out")]
    Timeout,

    /// The remote payload is not valid or not the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Reading or writing the quote store failed.
    #[error("storage error: {0}")]
    Storage(#[from] quotebook_core::CoreError),

    /// Sync was cancelled.
    #[error("sync cancelled")]
    Cancelled,

    /// Another sync is already running.
    #[error("sync already in progress")]
    InProgress,
}

impl SyncError {
    /// Creates a retryable network error.
    pub fn network_retryable(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable network error.
    pub fn network_fatal(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Network { retryable, .. } => *retryable,
            SyncError::Timeout => true,
            _ => false,
        }
    }
}

impl From<quotebook_sync_protocol::ProtocolError> for SyncError {
    fn from(e: quotebook_sync_protocol::ProtocolError) -> Self {
        SyncError::Decode(e.to_string())
    }
}

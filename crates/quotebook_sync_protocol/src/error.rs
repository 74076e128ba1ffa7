//! Error types for the sync protocol.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors decoding remote payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The payload is not JSON or not an array of posts.
    #[error("invalid remote payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A remote post cannot become a quote.
    #[error("remote post #{index} rejected: {source}")]
    InvalidPost {
        /// Position of the post in the payload.
        index: usize,
        /// Why the post was rejected.
        #[source]
        source: quotebook_core::CoreError,
    },
}

//! Error types for Quotebook core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in quote store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Side-store error.
    #[error("storage error: {0}")]
    Storage(#[from] quotebook_storage::StorageError),

    /// A quote field is empty after trimming.
    #[error("quote {field} must not be empty")]
    Validation {
        /// The rejected field (`text` or `category`).
        field: &'static str,
    },

    /// A payload is not valid JSON or not the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The stored value under a key could not be read back.
    ///
    /// Recovered internally by falling back to defaults.
    #[error("malformed storage under {key:?}: {message}")]
    MalformedStorage {
        /// The side-store key.
        key: String,
        /// Description of the problem.
        message: String,
    },

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates a validation error for the given field.
    pub fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns true if the caller supplied bad input (as opposed to an
    /// environment failure).
    pub fn is_input_error(&self) -> bool {
        matches!(self, CoreError::Validation { .. } | CoreError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_names_field() {
        assert_eq!(
            CoreError::validation("category").to_string(),
            "quote category must not be empty"
        );
    }

    #[test]
    fn input_errors() {
        assert!(CoreError::validation("text").is_input_error());
        assert!(CoreError::decode("bad").is_input_error());
        assert!(!CoreError::MalformedStorage {
            key: "quotes".into(),
            message: "eof".into(),
        }
        .is_input_error());
    }
}

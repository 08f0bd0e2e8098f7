//! Store-specific error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to complete the call.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A record could not be encoded or decoded.
    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record was written without its key attribute.
    #[error("Record is missing key attribute '{0}'")]
    MissingKey(String),
}

impl StoreError {
    /// Create a backend error from any displayable cause.
    pub fn backend(cause: impl std::fmt::Display) -> Self {
        Self::Backend(cause.to_string())
    }
}

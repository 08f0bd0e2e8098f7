//! Instruction-specific error types.

use thiserror::Error;

use crate::core::store::StoreError;

/// Result type for instruction repository operations.
pub type InstructionResult<T> = Result<T, InstructionError>;

/// Errors raised by the instruction repository.
#[derive(Debug, Error)]
pub enum InstructionError {
    /// Bad or missing required input.
    #[error("Error {operation}: {message}")]
    Validation {
        operation: &'static str,
        message: String,
    },

    /// The targeted instruction does not exist.
    #[error("Error {operation}: Instruction not found with ID: {id}")]
    NotFound { operation: &'static str, id: String },

    /// The underlying store call failed.
    #[error("Error {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// A stored record could not be read back as an instruction.
    #[error("Malformed instruction record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl InstructionError {
    /// Create a new validation error raised while running `operation`.
    pub fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            operation,
            message: message.into(),
        }
    }

    /// Create a new "not found" error raised while running `operation`.
    pub fn not_found(operation: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            operation,
            id: id.into(),
        }
    }

    /// Wrap a store failure with the operation that was running.
    pub fn store(operation: &'static str, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    /// Adapter for `map_err` on store results.
    pub fn during(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::store(operation, source)
    }
}

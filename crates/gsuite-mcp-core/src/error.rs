//! Core error types.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the pure core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed input: an interval or window whose start is after its end,
    /// or a constraint that cannot be satisfied by construction.
    #[error("validation error: {0}")]
    Validation(String),

    /// A datetime string that none of the accepted formats matched.
    #[error("unparseable datetime: {0:?}")]
    DateTimeParse(String),
}

impl CoreError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

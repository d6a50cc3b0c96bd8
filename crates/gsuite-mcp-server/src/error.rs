//! Server error types.

use std::io;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (stdio, files).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Protocol error (framing, encoding).
    #[error("protocol error: {0}")]
    Protocol(#[from] gsuite_mcp_protocol::ProtocolError),

    /// Validation error from the core.
    #[error("{0}")]
    Core(#[from] gsuite_mcp_core::CoreError),

    /// Google API error.
    #[error("{0}")]
    Provider(#[from] gsuite_mcp_providers::ProviderError),

    /// Tracing initialization error.
    #[error("tracing error: {0}")]
    Tracing(#[from] gsuite_mcp_core::tracing::TracingError),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A tool was called with missing or ill-typed arguments.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// A tool name the registry does not know.
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Creates an unknown tool error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }
}

//! MCP server exposing Google Calendar and Gmail tools.
//!
//! Speaks JSON-RPC 2.0 over stdio. The algorithmic pieces live in
//! `gsuite-mcp-core`, the wire types in `gsuite-mcp-protocol` and the
//! Google API clients in `gsuite-mcp-providers`; this crate wires them
//! into an MCP tool surface.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod render;
pub mod router;
pub mod stdio;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::ToolRouter;
pub use stdio::McpServer;

//! MCP wire layer for gsuite-mcp.
//!
//! JSON-RPC 2.0 message types and the newline-delimited framing used by MCP
//! stdio transports. One message per line, responses written in request
//! order.

mod error;
mod framing;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{LineReader, LineWriter};
pub use types::{
    CallToolParams, CallToolResult, InitializeResult, JSONRPC_VERSION, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, MCP_PROTOCOL_VERSION, RequestId, RpcError,
    ServerCapabilities, ServerInfo, ToolContent, ToolDescriptor, ToolsCapability,
};

/// Maximum message size (4 MB). Email bodies can be sizeable.
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

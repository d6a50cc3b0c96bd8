//! The stdio request loop.
//!
//! Reads one JSON-RPC message per line from stdin and writes one response
//! per request to stdout. The host runtime serializes calls, so requests
//! are handled strictly in order. Logging goes to stderr only.

use std::io::{BufRead, Write};

use serde_json::json;
use tracing::{debug, info, warn};

use gsuite_mcp_protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    LineReader, LineWriter, ListToolsResult, MCP_PROTOCOL_VERSION, RequestId, RpcError,
    ServerCapabilities, ServerInfo,
};

use crate::error::{ServerError, ServerResult};
use crate::registry::tool_descriptors;
use crate::router::ToolRouter;

/// The MCP server: protocol state machine over a tool router.
#[derive(Debug)]
pub struct McpServer {
    router: ToolRouter,
}

impl McpServer {
    /// Creates a server around the given router.
    pub fn new(router: ToolRouter) -> Self {
        Self { router }
    }

    /// Runs the request loop until stdin closes.
    pub async fn run(&self) -> ServerResult<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Serves requests from `input`, writing responses to `output`.
    ///
    /// Split out from [`run`](Self::run) so tests can drive it with
    /// in-memory streams.
    pub async fn serve<R: BufRead, W: Write>(&self, input: R, output: W) -> ServerResult<()> {
        let mut reader = LineReader::new(input);
        let mut writer = LineWriter::new(output);

        info!("serving MCP on stdio");
        loop {
            let request: JsonRpcRequest = match reader.read_message() {
                Ok(Some(request)) => request,
                Ok(None) => {
                    info!("stdin closed, shutting down");
                    return Ok(());
                }
                Err(gsuite_mcp_protocol::ProtocolError::Serialization(e)) => {
                    warn!("unparseable request: {}", e);
                    writer.write_message(&JsonRpcResponse::error(
                        None,
                        RpcError::parse_error(e.to_string()),
                    ))?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(response) = self.handle_request(request).await {
                writer.write_message(&response)?;
            }
        }
    }

    /// Handles one request; returns None for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != gsuite_mcp_protocol::JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                RpcError::invalid_request(format!(
                    "unsupported JSON-RPC version: {}",
                    request.jsonrpc
                )),
            ));
        }

        debug!(method = %request.method, "handling request");
        match request.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: MCP_PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities::default(),
                    server_info: ServerInfo {
                        name: env!("CARGO_PKG_NAME").to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                };
                Some(result_response(request.id, &result))
            }
            "ping" => Some(JsonRpcResponse::success(request.id, json!({}))),
            "tools/list" => {
                let result = ListToolsResult {
                    tools: tool_descriptors(),
                };
                Some(result_response(request.id, &result))
            }
            "tools/call" => Some(self.handle_tool_call(request).await),
            method if method.starts_with("notifications/") => {
                debug!(method, "ignoring notification");
                None
            }
            method => {
                if request.is_notification() {
                    return None;
                }
                Some(JsonRpcResponse::error(
                    request.id,
                    RpcError::method_not_found(method),
                ))
            }
        }
    }

    async fn handle_tool_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: CallToolParams = match request
            .params
            .map(serde_json::from_value)
            .transpose()
        {
            Ok(Some(params)) => params,
            Ok(None) => {
                return JsonRpcResponse::error(
                    request.id,
                    RpcError::invalid_params("missing params"),
                );
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    request.id,
                    RpcError::invalid_params(e.to_string()),
                );
            }
        };

        // Tool failures become error contents rather than protocol errors,
        // so the calling agent can read and react to the message.
        let result = match self.router.dispatch(&params.name, &params.arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %params.name, error = %e, "tool call failed");
                CallToolResult::error(render_error(&e))
            }
        };
        result_response(request.id, &result)
    }
}

fn result_response(id: Option<RequestId>, result: &impl serde::Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, RpcError::internal(e.to_string())),
    }
}

fn render_error(error: &ServerError) -> String {
    format!("❌ {}", error)
}

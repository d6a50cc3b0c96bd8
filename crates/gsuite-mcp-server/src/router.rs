//! Tool dispatch.

use serde_json::{Map, Value};
use tracing::debug;

use gsuite_mcp_protocol::CallToolResult;

use crate::error::{ServerError, ServerResult};
use crate::handlers::{ToolContext, calendar, gmail};

/// Routes a tool name plus argument map to its handler.
#[derive(Debug)]
pub struct ToolRouter {
    ctx: ToolContext,
}

impl ToolRouter {
    /// Creates a router around the shared tool context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Dispatches one tool call.
    ///
    /// Handler failures come back as typed [`ServerError`]s; the stdio loop
    /// decides how they appear on the wire.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> ServerResult<CallToolResult> {
        debug!(tool = name, "dispatching tool call");
        match name {
            "list_events" => calendar::list_events(&self.ctx, args).await,
            "search_events" => calendar::search_events(&self.ctx, args).await,
            "create_event" => calendar::create_event(&self.ctx, args).await,
            "delete_event" => calendar::delete_event(&self.ctx, args).await,
            "find_free_slots" => calendar::free_slots(&self.ctx, args).await,
            "search_emails" => gmail::search_emails(&self.ctx, args).await,
            "read_email" => gmail::read_email(&self.ctx, args).await,
            "send_email" => gmail::send_email(&self.ctx, args).await,
            "reply_email" => gmail::reply_email(&self.ctx, args).await,
            "delete_email" => gmail::delete_email(&self.ctx, args).await,
            "label_email" => gmail::label_email(&self.ctx, args).await,
            other => Err(ServerError::unknown_tool(other)),
        }
    }
}

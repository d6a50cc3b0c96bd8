//! Gmail tool handlers.

use serde_json::{Map, Value};
use tracing::info;

use gsuite_mcp_protocol::CallToolResult;
use gsuite_mcp_providers::google::MailDraft;
use gsuite_mcp_providers::google::mime::reply_subject;

use crate::error::{ServerError, ServerResult};

use super::{ToolContext, optional_i64, optional_str, optional_str_array, require_str};

const DEFAULT_MAX_RESULTS: usize = 10;

/// `search_emails`: Gmail query search.
pub async fn search_emails(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let query = require_str(args, "query")?;
    let max_results = match optional_i64(args, "max_results")? {
        None => DEFAULT_MAX_RESULTS,
        Some(n) if n > 0 => n as usize,
        Some(_) => {
            return Err(ServerError::invalid_arguments(
                "'max_results' must be positive",
            ));
        }
    };

    let messages = ctx.gmail().await?.search_messages(query, max_results).await?;
    if messages.is_empty() {
        return Ok(CallToolResult::text(format!(
            "No emails matching \"{}\".",
            query
        )));
    }

    let mut text = format!("📧 Emails matching \"{}\":", query);
    for message in &messages {
        text.push_str(&format!(
            "\n\n• {}\n  From: {}\n  Date: {}\n  ID: {}",
            message.subject, message.from, message.date, message.id
        ));
        if !message.snippet.is_empty() {
            text.push_str(&format!("\n  {}", message.snippet));
        }
    }
    Ok(CallToolResult::text(text))
}

/// `read_email`: full message with text body.
pub async fn read_email(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let message_id = require_str(args, "message_id")?;
    let message = ctx.gmail().await?.get_message(message_id).await?;

    Ok(CallToolResult::text(format!(
        "✉️ {}\nFrom: {}\nTo: {}\nDate: {}\n\n{}",
        message.subject, message.from, message.to, message.date, message.body
    )))
}

/// `send_email`: send a fresh plain-text message.
pub async fn send_email(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let to = require_str(args, "to")?;
    let subject = require_str(args, "subject")?;
    let body = require_str(args, "body")?;

    let mut draft = MailDraft::new(to, subject, body);
    if let Some(cc) = optional_str(args, "cc")? {
        draft = draft.with_cc(cc);
    }

    let id = ctx.gmail().await?.send(&draft.to_rfc5322(), None).await?;
    info!(message_id = %id, "sent email");
    Ok(CallToolResult::text(format!(
        "✅ Email sent to {}.\n  ID: {}",
        to, id
    )))
}

/// `reply_email`: reply within the original thread.
pub async fn reply_email(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let message_id = require_str(args, "message_id")?;
    let body = require_str(args, "body")?;

    let gmail = ctx.gmail().await?;
    let original = gmail.get_message(message_id).await?;
    if original.from.is_empty() {
        return Err(ServerError::invalid_arguments(format!(
            "message {} has no From header to reply to",
            message_id
        )));
    }

    let mut draft = MailDraft::new(&original.from, reply_subject(&original.subject), body);
    if let Some(ref original_id) = original.message_id_header {
        draft = draft.in_reply_to(original_id, original.references.as_deref());
    }

    let id = gmail
        .send(&draft.to_rfc5322(), Some(&original.thread_id))
        .await?;
    info!(message_id = %id, thread_id = %original.thread_id, "sent reply");
    Ok(CallToolResult::text(format!(
        "✅ Reply sent to {}.\n  ID: {}",
        original.from, id
    )))
}

/// `delete_email`: move a message to the trash.
pub async fn delete_email(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let message_id = require_str(args, "message_id")?;
    ctx.gmail().await?.trash_message(message_id).await?;
    info!(message_id, "trashed email");
    Ok(CallToolResult::text(format!(
        "✅ Moved message {} to the trash.",
        message_id
    )))
}

/// `label_email`: add/remove label ids.
pub async fn label_email(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let message_id = require_str(args, "message_id")?;
    let add = optional_str_array(args, "add_labels")?;
    let remove = optional_str_array(args, "remove_labels")?;
    if add.is_empty() && remove.is_empty() {
        return Err(ServerError::invalid_arguments(
            "at least one of 'add_labels' or 'remove_labels' is required",
        ));
    }

    let labels = ctx
        .gmail()
        .await?
        .modify_labels(message_id, &add, &remove)
        .await?;
    Ok(CallToolResult::text(format!(
        "✅ Updated labels on {}.\n  Now: {}",
        message_id,
        if labels.is_empty() {
            "(none)".to_string()
        } else {
            labels.join(", ")
        }
    )))
}

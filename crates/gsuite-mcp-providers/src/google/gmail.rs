//! Gmail API v1 client.
//!
//! Search, read, send, trash and relabel messages for the authenticated
//! user. Message bodies are extracted from the multipart payload, preferring
//! the `text/plain` part.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

use super::calendar::{check_status, map_send_error};

/// Base URL for the authenticated user's Gmail v1 mailbox.
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// A message as returned by a search: headers and snippet only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub from: String,
    pub date: String,
    pub snippet: String,
}

/// A fully fetched message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub date: String,
    /// The RFC 5322 Message-ID header, used for reply threading.
    pub message_id_header: Option<String>,
    pub references: Option<String>,
    pub body: String,
    pub label_ids: Vec<String>,
}

/// Gmail API client.
#[derive(Debug)]
pub struct GmailClient {
    http_client: reqwest::Client,
    access_token: String,
}

impl GmailClient {
    /// Creates a new client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
        })
    }

    /// Searches messages with a Gmail query string (e.g. `from:alice is:unread`).
    ///
    /// Returns summaries in the order Gmail ranks them (newest first).
    pub async fn search_messages(
        &self,
        query: &str,
        max_results: usize,
    ) -> ProviderResult<Vec<MessageSummary>> {
        let url = format!("{}/messages", GMAIL_API_BASE);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("q", query), ("maxResults", &max_results.to_string())])
            .send()
            .await
            .map_err(map_send_error)?;
        let body = check_status(response, "gmail").await?;

        let list: MessageListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse message list: {}", e))
                .with_service("gmail")
        })?;

        // The list endpoint only returns ids; headers need one fetch each.
        let mut summaries = Vec::with_capacity(list.messages.len());
        for reference in list.messages {
            summaries.push(self.fetch_summary(&reference.id).await?);
        }
        debug!("search {:?} matched {} messages", query, summaries.len());
        Ok(summaries)
    }

    async fn fetch_summary(&self, id: &str) -> ProviderResult<MessageSummary> {
        let url = format!("{}/messages/{}", GMAIL_API_BASE, urlencoding::encode(id));
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("format", "metadata"),
                ("metadataHeaders", "Subject"),
                ("metadataHeaders", "From"),
                ("metadataHeaders", "Date"),
            ])
            .send()
            .await
            .map_err(map_send_error)?;
        let body = check_status(response, "gmail").await?;

        let message: ApiMessage = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse message: {}", e))
                .with_service("gmail")
        })?;

        Ok(summarize(message))
    }

    /// Fetches a full message, including its plain-text body.
    pub async fn get_message(&self, id: &str) -> ProviderResult<MailMessage> {
        let url = format!("{}/messages/{}", GMAIL_API_BASE, urlencoding::encode(id));
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("format", "full")])
            .send()
            .await
            .map_err(map_send_error)?;
        let body = check_status(response, "gmail").await?;

        let message: ApiMessage = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse message: {}", e))
                .with_service("gmail")
        })?;

        Ok(hydrate(message))
    }

    /// Sends a raw RFC 5322 message, optionally threading it into an
    /// existing conversation.
    ///
    /// Returns the id of the sent message.
    pub async fn send(&self, raw_message: &str, thread_id: Option<&str>) -> ProviderResult<String> {
        let url = format!("{}/messages/send", GMAIL_API_BASE);
        let mut payload = json!({
            "raw": URL_SAFE_NO_PAD.encode(raw_message.as_bytes()),
        });
        if let Some(thread_id) = thread_id {
            payload["threadId"] = json!(thread_id);
        }

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(map_send_error)?;
        let body = check_status(response, "gmail").await?;

        let sent: MessageReference = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse send response: {}", e))
                .with_service("gmail")
        })?;
        debug!("sent message {}", sent.id);
        Ok(sent.id)
    }

    /// Moves a message to the trash.
    pub async fn trash_message(&self, id: &str) -> ProviderResult<()> {
        let url = format!(
            "{}/messages/{}/trash",
            GMAIL_API_BASE,
            urlencoding::encode(id)
        );
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(map_send_error)?;
        check_status(response, "gmail").await?;
        debug!("trashed message {}", id);
        Ok(())
    }

    /// Adds and/or removes label ids on a message.
    pub async fn modify_labels(
        &self,
        id: &str,
        add: &[String],
        remove: &[String],
    ) -> ProviderResult<Vec<String>> {
        let url = format!(
            "{}/messages/{}/modify",
            GMAIL_API_BASE,
            urlencoding::encode(id)
        );
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({
                "addLabelIds": add,
                "removeLabelIds": remove,
            }))
            .send()
            .await
            .map_err(map_send_error)?;
        let body = check_status(response, "gmail").await?;

        let message: ApiMessage = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse modify response: {}", e))
                .with_service("gmail")
        })?;
        Ok(message.label_ids)
    }
}

fn summarize(message: ApiMessage) -> MessageSummary {
    let headers = message
        .payload
        .as_ref()
        .map(|p| p.headers.as_slice())
        .unwrap_or_default();
    MessageSummary {
        subject: header(headers, "Subject").unwrap_or_else(|| "(no subject)".to_string()),
        from: header(headers, "From").unwrap_or_default(),
        date: header(headers, "Date").unwrap_or_default(),
        id: message.id,
        thread_id: message.thread_id,
        snippet: message.snippet.unwrap_or_default(),
    }
}

fn hydrate(message: ApiMessage) -> MailMessage {
    let (headers, body) = match message.payload {
        Some(ref payload) => (payload.headers.as_slice(), extract_text_body(payload)),
        None => (&[][..], None),
    };
    MailMessage {
        subject: header(headers, "Subject").unwrap_or_else(|| "(no subject)".to_string()),
        from: header(headers, "From").unwrap_or_default(),
        to: header(headers, "To").unwrap_or_default(),
        date: header(headers, "Date").unwrap_or_default(),
        message_id_header: header(headers, "Message-ID"),
        references: header(headers, "References"),
        body: body.unwrap_or_else(|| "(no text body)".to_string()),
        id: message.id,
        thread_id: message.thread_id,
        label_ids: message.label_ids,
    }
}

/// Case-insensitive header lookup.
fn header(headers: &[ApiHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.clone())
}

/// Walks a message payload looking for a decodable text body.
///
/// Prefers `text/plain`, falls back to `text/html`, and recurses into
/// `multipart/*` containers.
fn extract_text_body(payload: &ApiPayload) -> Option<String> {
    find_part(payload, "text/plain").or_else(|| find_part(payload, "text/html"))
}

fn find_part(payload: &ApiPayload, mime_type: &str) -> Option<String> {
    if payload.mime_type.as_deref() == Some(mime_type) {
        if let Some(data) = payload.body.as_ref().and_then(|b| b.data.as_deref()) {
            return decode_body(data);
        }
    }
    payload
        .parts
        .iter()
        .flatten()
        .find_map(|part| find_part(part, mime_type))
}

fn decode_body(data: &str) -> Option<String> {
    // Gmail uses base64url, usually unpadded.
    let trimmed = data.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(trimmed).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageReference>,
}

#[derive(Debug, Deserialize)]
struct MessageReference {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    id: String,
    #[serde(rename = "threadId")]
    thread_id: String,
    #[serde(rename = "labelIds", default)]
    label_ids: Vec<String>,
    snippet: Option<String>,
    payload: Option<ApiPayload>,
}

#[derive(Debug, Deserialize)]
struct ApiPayload {
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    #[serde(default)]
    headers: Vec<ApiHeader>,
    body: Option<ApiBody>,
    parts: Option<Vec<ApiPayload>>,
}

#[derive(Debug, Deserialize)]
struct ApiHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiBody {
    data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(json: serde_json::Value) -> ApiMessage {
        serde_json::from_value(json).unwrap()
    }

    fn encode(text: &str) -> String {
        URL_SAFE_NO_PAD.encode(text.as_bytes())
    }

    #[test]
    fn summary_from_metadata() {
        let msg = message(json!({
            "id": "m1",
            "threadId": "t1",
            "snippet": "Hi there",
            "payload": {
                "headers": [
                    {"name": "Subject", "value": "Hello"},
                    {"name": "From", "value": "Alice <alice@example.com>"},
                    {"name": "Date", "value": "Wed, 5 Feb 2025 10:00:00 +0000"}
                ]
            }
        }));

        let summary = summarize(msg);
        assert_eq!(summary.subject, "Hello");
        assert_eq!(summary.from, "Alice <alice@example.com>");
        assert_eq!(summary.snippet, "Hi there");
    }

    #[test]
    fn summary_without_subject_gets_placeholder() {
        let msg = message(json!({"id": "m1", "threadId": "t1"}));
        assert_eq!(summarize(msg).subject, "(no subject)");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers = vec![ApiHeader {
            name: "message-id".to_string(),
            value: "<abc@mail>".to_string(),
        }];
        assert_eq!(header(&headers, "Message-ID").as_deref(), Some("<abc@mail>"));
    }

    #[test]
    fn body_from_flat_text_message() {
        let msg = message(json!({
            "id": "m1",
            "threadId": "t1",
            "payload": {
                "mimeType": "text/plain",
                "headers": [],
                "body": {"data": encode("plain body")}
            }
        }));
        assert_eq!(hydrate(msg).body, "plain body");
    }

    #[test]
    fn body_prefers_plain_part_in_multipart() {
        let msg = message(json!({
            "id": "m1",
            "threadId": "t1",
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [],
                "parts": [
                    {"mimeType": "text/html", "body": {"data": encode("<b>html</b>")}},
                    {"mimeType": "text/plain", "body": {"data": encode("plain")}}
                ]
            }
        }));
        assert_eq!(hydrate(msg).body, "plain");
    }

    #[test]
    fn body_recurses_into_nested_multiparts() {
        let msg = message(json!({
            "id": "m1",
            "threadId": "t1",
            "payload": {
                "mimeType": "multipart/mixed",
                "headers": [],
                "parts": [
                    {
                        "mimeType": "multipart/alternative",
                        "parts": [
                            {"mimeType": "text/plain", "body": {"data": encode("nested")}}
                        ]
                    },
                    {"mimeType": "application/pdf", "body": {}}
                ]
            }
        }));
        assert_eq!(hydrate(msg).body, "nested");
    }

    #[test]
    fn body_falls_back_to_html() {
        let msg = message(json!({
            "id": "m1",
            "threadId": "t1",
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [],
                "parts": [
                    {"mimeType": "text/html", "body": {"data": encode("<p>only html</p>")}}
                ]
            }
        }));
        assert_eq!(hydrate(msg).body, "<p>only html</p>");
    }

    #[test]
    fn missing_body_gets_placeholder() {
        let msg = message(json!({
            "id": "m1",
            "threadId": "t1",
            "payload": {"mimeType": "text/plain", "headers": []}
        }));
        assert_eq!(hydrate(msg).body, "(no text body)");
    }

    #[test]
    fn decode_tolerates_padding() {
        use base64::engine::general_purpose::URL_SAFE;
        let padded = URL_SAFE.encode("padded?");
        assert!(padded.ends_with('='));
        assert_eq!(decode_body(&padded).unwrap(), "padded?");
    }

    #[test]
    fn threading_headers_are_extracted() {
        let msg = message(json!({
            "id": "m1",
            "threadId": "t1",
            "labelIds": ["INBOX", "UNREAD"],
            "payload": {
                "mimeType": "text/plain",
                "headers": [
                    {"name": "Message-ID", "value": "<orig@mail.example>"},
                    {"name": "References", "value": "<first@mail.example>"}
                ],
                "body": {"data": encode("x")}
            }
        }));
        let mail = hydrate(msg);
        assert_eq!(mail.message_id_header.as_deref(), Some("<orig@mail.example>"));
        assert_eq!(mail.references.as_deref(), Some("<first@mail.example>"));
        assert_eq!(mail.label_ids, vec!["INBOX", "UNREAD"]);
    }
}

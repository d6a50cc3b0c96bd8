//! Google Calendar API v3 client.
//!
//! A thin authenticated HTTP client: list and search events inside a time
//! window, insert new events, delete events. Responses are normalized into
//! [`CalendarEvent`] with [`EventTime`] start/end values.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use gsuite_mcp_core::time::{EventTime, TimeWindow};

use crate::error::{ProviderError, ProviderResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// A normalized calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub html_link: Option<String>,
}

/// A new event to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

/// Google Calendar API client.
#[derive(Debug)]
pub struct CalendarClient {
    http_client: reqwest::Client,
    access_token: String,
}

impl CalendarClient {
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

    /// Lists events in a calendar inside the given window, expanded and
    /// ordered by start time.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        max_results: Option<usize>,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        self.fetch_events(calendar_id, window, None, max_results).await
    }

    /// Free-text search over title, description and location.
    pub async fn search_events(
        &self,
        calendar_id: &str,
        query: &str,
        window: &TimeWindow,
        max_results: Option<usize>,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        self.fetch_events(calendar_id, window, Some(query), max_results)
            .await
    }

    async fn fetch_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        query: Option<&str>,
        max_results: Option<usize>,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .fetch_events_page(
                    calendar_id,
                    window,
                    query,
                    max_results,
                    page_token.as_deref(),
                )
                .await?;

            for item in page.items {
                if let Some(event) = convert_event(item) {
                    events.push(event);
                }
            }

            if let Some(max) = max_results {
                if events.len() >= max {
                    events.truncate(max);
                    break;
                }
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "fetched {} events from calendar {}",
            events.len(),
            calendar_id
        );
        Ok(events)
    }

    async fn fetch_events_page(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        query: Option<&str>,
        max_results: Option<usize>,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id)
        );

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", window.start.to_rfc3339()),
                ("timeMax", window.end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]);

        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }
        if let Some(max) = max_results {
            request = request.query(&[("maxResults", max.to_string())]);
        }
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(map_send_error)?;
        let body = check_status(response, "calendar").await?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse event list: {}", e))
                .with_service("calendar")
        })
    }

    /// Inserts a new event and returns it as stored by Google.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> ProviderResult<CalendarEvent> {
        let url = format!(
            "{}/calendars/{}/events",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id)
        );

        let mut body = json!({
            "summary": draft.summary,
            "start": {"dateTime": draft.start.to_rfc3339()},
            "end": {"dateTime": draft.end.to_rfc3339()},
        });
        if let Some(ref description) = draft.description {
            body["description"] = json!(description);
        }
        if let Some(ref location) = draft.location {
            body["location"] = json!(location);
        }
        if !draft.attendees.is_empty() {
            body["attendees"] = json!(
                draft
                    .attendees
                    .iter()
                    .map(|email| json!({"email": email}))
                    .collect::<Vec<_>>()
            );
        }

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        let body = check_status(response, "calendar").await?;

        let event: ApiEvent = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse created event: {}", e))
                .with_service("calendar")
        })?;

        convert_event(event).ok_or_else(|| {
            ProviderError::invalid_response("created event is missing start or end time")
                .with_service("calendar")
        })
    }

    /// Deletes an event by id.
    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            CALENDAR_API_BASE,
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id)
        );

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(map_send_error)?;
        check_status(response, "calendar").await?;
        debug!("deleted event {}", event_id);
        Ok(())
    }
}

/// Maps a reqwest transport error to a provider error.
pub(crate) fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::network("request timeout")
    } else if e.is_connect() {
        ProviderError::network(format!("connection failed: {}", e))
    } else {
        ProviderError::network(format!("request failed: {}", e))
    }
}

/// Maps non-success statuses to provider errors and returns the body text.
pub(crate) async fn check_status(
    response: reqwest::Response,
    service: &str,
) -> ProviderResult<String> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        ))
        .with_service(service));
    }
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(
            ProviderError::authentication("access token expired or invalid").with_service(service)
        );
    }
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::authorization("access denied").with_service(service));
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ProviderError::not_found("resource not found").with_service(service));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

    if status == reqwest::StatusCode::BAD_REQUEST {
        return Err(
            ProviderError::bad_request(format!("API rejected request: {}", body))
                .with_service(service),
        );
    }
    if !status.is_success() {
        return Err(
            ProviderError::server(format!("API error ({}): {}", status, body))
                .with_service(service),
        );
    }
    Ok(body)
}

fn convert_event(event: ApiEvent) -> Option<CalendarEvent> {
    // Cancelled instances of recurring events come back as tombstones.
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }
    let start = convert_event_time(event.start?)?;
    let end = convert_event_time(event.end?)?;
    Some(CalendarEvent {
        id: event.id,
        summary: event.summary.unwrap_or_else(|| "(no title)".to_string()),
        start,
        end,
        location: event.location,
        description: event.description,
        html_link: event.html_link,
    })
}

fn convert_event_time(time: ApiEventTime) -> Option<EventTime> {
    if let Some(date_time) = time.date_time {
        let parsed = DateTime::parse_from_rfc3339(&date_time).ok()?;
        return Some(EventTime::from_local(parsed));
    }
    if let Some(date) = time.date {
        let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
        return Some(EventTime::from_date(parsed));
    }
    None
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    id: String,
    summary: Option<String>,
    status: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
    location: Option<String>,
    description: Option<String>,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEventTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn api_event(json: serde_json::Value) -> ApiEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn converts_timed_event() {
        let event = api_event(json!({
            "id": "evt1",
            "summary": "Standup",
            "status": "confirmed",
            "start": {"dateTime": "2025-02-05T10:00:00+01:00"},
            "end": {"dateTime": "2025-02-05T10:30:00+01:00"},
            "location": "Room 4",
            "htmlLink": "https://calendar.google.com/event?eid=abc"
        }));

        let converted = convert_event(event).unwrap();
        assert_eq!(converted.id, "evt1");
        assert_eq!(converted.summary, "Standup");
        assert_eq!(
            converted.start.to_utc_datetime(),
            Utc.with_ymd_and_hms(2025, 2, 5, 9, 0, 0).unwrap()
        );
        assert_eq!(converted.location.as_deref(), Some("Room 4"));
        assert!(converted.html_link.is_some());
    }

    #[test]
    fn converts_all_day_event() {
        let event = api_event(json!({
            "id": "evt2",
            "summary": "Conference",
            "start": {"date": "2025-02-05"},
            "end": {"date": "2025-02-06"}
        }));

        let converted = convert_event(event).unwrap();
        assert!(converted.start.is_all_day());
        assert!(converted.end.is_all_day());
    }

    #[test]
    fn skips_cancelled_events() {
        let event = api_event(json!({
            "id": "evt3",
            "status": "cancelled"
        }));
        assert!(convert_event(event).is_none());
    }

    #[test]
    fn untitled_event_gets_placeholder() {
        let event = api_event(json!({
            "id": "evt4",
            "start": {"dateTime": "2025-02-05T10:00:00Z"},
            "end": {"dateTime": "2025-02-05T11:00:00Z"}
        }));
        assert_eq!(convert_event(event).unwrap().summary, "(no title)");
    }

    #[test]
    fn event_without_times_is_skipped() {
        let event = api_event(json!({"id": "evt5", "summary": "broken"}));
        assert!(convert_event(event).is_none());
    }

    #[test]
    fn list_response_tolerates_missing_items() {
        let response: EventListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
        assert!(response.next_page_token.is_none());
    }
}

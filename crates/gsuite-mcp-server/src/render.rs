//! Shared text formatting for tool output.
//!
//! Tool results are human-readable text blocks; the calling agent quotes
//! them to the user, so times are rendered in a friendly fixed format
//! (`Wed, Feb 05 at 10:30 AM`, UTC).

use chrono::{DateTime, Utc};

use gsuite_mcp_core::time::EventTime;
use gsuite_mcp_providers::google::CalendarEvent;

const FRIENDLY_FORMAT: &str = "%a, %b %d at %I:%M %p";

/// Formats a UTC instant for display.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format(FRIENDLY_FORMAT).to_string()
}

/// Formats an event time, marking all-day entries.
pub fn format_event_time(time: &EventTime) -> String {
    match time {
        EventTime::DateTime(dt) => format_datetime(*dt),
        EventTime::AllDay(date) => format!("{} (all day)", date.format("%a, %b %d")),
    }
}

/// Renders one event as a bullet entry.
pub fn format_event(event: &CalendarEvent) -> String {
    let mut lines = format!(
        "• {}\n  {}",
        format_event_time(&event.start),
        event.summary
    );
    if let Some(ref location) = event.location {
        lines.push_str(&format!("\n  📍 {}", location));
    }
    lines.push_str(&format!("\n  ID: {}", event.id));
    lines
}

/// Renders a bullet list of events under a heading.
pub fn format_event_list(heading: &str, events: &[CalendarEvent]) -> String {
    let mut out = String::from(heading);
    for event in events {
        out.push_str("\n\n");
        out.push_str(&format_event(event));
    }
    out
}

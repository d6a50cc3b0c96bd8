//! Calendar tool handlers.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;

use gsuite_mcp_core::slots::{BusyInterval, SlotConstraints, find_free_slots};
use gsuite_mcp_core::time::{TimeWindow, parse_date_input, parse_datetime_input};
use gsuite_mcp_protocol::CallToolResult;
use gsuite_mcp_providers::google::EventDraft;

use crate::error::{ServerError, ServerResult};
use crate::render::{format_datetime, format_event_list};

use super::{ToolContext, optional_bool, optional_i64, optional_str, optional_str_array, require_str};

const DEFAULT_MAX_RESULTS: usize = 10;

/// How many slots find_free_slots shows at most. Presentation only; the
/// scan itself is unbounded.
const MAX_RENDERED_SLOTS: usize = 10;

/// `list_events`: events for a named or custom time range.
pub async fn list_events(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let range = optional_str(args, "time_range")?.unwrap_or("today");
    let max_results = max_results(args)?;
    let (window, label) = resolve_window(range, args)?;

    let events = ctx
        .calendar()
        .await?
        .list_events(&ctx.config().calendar_id, &window, Some(max_results))
        .await?;

    if events.is_empty() {
        return Ok(CallToolResult::text(format!(
            "No events found for {}.",
            label
        )));
    }
    info!(count = events.len(), range = label, "listed events");
    Ok(CallToolResult::text(format_event_list(
        &format!("📅 Events for {}:", label),
        &events,
    )))
}

/// `search_events`: free-text search over upcoming events.
pub async fn search_events(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let query = require_str(args, "query")?;
    let days_ahead = optional_i64(args, "days_ahead")?.unwrap_or(30);
    if days_ahead <= 0 {
        return Err(ServerError::invalid_arguments("'days_ahead' must be positive"));
    }
    let max_results = max_results(args)?;
    let window = TimeWindow::days_ahead(Utc::now(), days_ahead);

    let events = ctx
        .calendar()
        .await?
        .search_events(&ctx.config().calendar_id, query, &window, Some(max_results))
        .await?;

    if events.is_empty() {
        return Ok(CallToolResult::text(format!(
            "No events matching \"{}\".",
            query
        )));
    }
    Ok(CallToolResult::text(format_event_list(
        &format!("🔍 Events matching \"{}\":", query),
        &events,
    )))
}

/// `create_event`: insert a new event.
pub async fn create_event(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let summary = require_str(args, "summary")?;
    let start = parse_datetime_input(require_str(args, "start_time")?)?;
    let end = parse_datetime_input(require_str(args, "end_time")?)?;
    if start >= end {
        return Err(ServerError::invalid_arguments(
            "'start_time' must be before 'end_time'",
        ));
    }

    let draft = EventDraft {
        summary: summary.to_string(),
        start,
        end,
        description: optional_str(args, "description")?.map(String::from),
        location: optional_str(args, "location")?.map(String::from),
        attendees: optional_str_array(args, "attendees")?,
    };

    let event = ctx
        .calendar()
        .await?
        .insert_event(&ctx.config().calendar_id, &draft)
        .await?;

    info!(event_id = %event.id, "created event");
    let mut text = format!(
        "✅ Created \"{}\"\n  Starts: {}\n  ID: {}",
        event.summary,
        format_datetime(start),
        event.id
    );
    if let Some(link) = event.html_link {
        text.push_str(&format!("\n  Link: {}", link));
    }
    Ok(CallToolResult::text(text))
}

/// `delete_event`: remove an event by id.
pub async fn delete_event(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let event_id = require_str(args, "event_id")?;
    ctx.calendar()
        .await?
        .delete_event(&ctx.config().calendar_id, event_id)
        .await?;
    info!(event_id, "deleted event");
    Ok(CallToolResult::text(format!(
        "✅ Deleted event {}.",
        event_id
    )))
}

/// `find_free_slots`: scan the coming days for open time.
pub async fn free_slots(
    ctx: &ToolContext,
    args: &Map<String, Value>,
) -> ServerResult<CallToolResult> {
    let duration_minutes = optional_i64(args, "duration_minutes")?.unwrap_or(60);
    let days_ahead = optional_i64(args, "days_ahead")?.unwrap_or(7);
    if days_ahead <= 0 {
        return Err(ServerError::invalid_arguments("'days_ahead' must be positive"));
    }
    let work_hours_only = optional_bool(args, "work_hours_only")?.unwrap_or(true);

    let window = TimeWindow::days_ahead(Utc::now(), days_ahead);
    let events = ctx
        .calendar()
        .await?
        .list_events(&ctx.config().calendar_id, &window, None)
        .await?;

    let busy: Vec<BusyInterval> = events
        .iter()
        .map(|event| {
            BusyInterval::new(
                event.start.to_utc_datetime(),
                event.end.to_utc_datetime(),
            )
        })
        .collect();

    let mut constraints = SlotConstraints::default().with_min_duration(duration_minutes);
    if work_hours_only {
        constraints = constraints.with_work_hours(
            ctx.config().work_start_hour,
            ctx.config().work_end_hour,
        );
    }

    let slots = find_free_slots(&busy, &window, &constraints)?;
    if slots.is_empty() {
        return Ok(CallToolResult::text(format!(
            "No free slots of {} minutes found in the next {} days.",
            duration_minutes, days_ahead
        )));
    }

    let mut text = format!(
        "🕐 Free slots ({}+ minutes) in the next {} days:",
        duration_minutes, days_ahead
    );
    for slot in slots.iter().take(MAX_RENDERED_SLOTS) {
        text.push_str(&format!(
            "\n• {} - {} ({} min)",
            format_datetime(slot.start),
            format_datetime(slot.end),
            slot.duration_minutes
        ));
    }
    if slots.len() > MAX_RENDERED_SLOTS {
        text.push_str(&format!(
            "\n… and {} more.",
            slots.len() - MAX_RENDERED_SLOTS
        ));
    }
    Ok(CallToolResult::text(text))
}

/// Maps a `time_range` argument to a window and a display label.
fn resolve_window(
    range: &str,
    args: &Map<String, Value>,
) -> ServerResult<(TimeWindow, String)> {
    let now = Utc::now();
    match range {
        "today" => Ok((TimeWindow::today(now), "today".to_string())),
        "tomorrow" => Ok((TimeWindow::tomorrow(now), "tomorrow".to_string())),
        "this_week" => Ok((TimeWindow::this_week(now), "this week".to_string())),
        "next_week" => Ok((TimeWindow::next_week(now), "next week".to_string())),
        "custom" => {
            let start = parse_date_input(require_str(args, "start_date")?)?;
            let end = parse_date_input(require_str(args, "end_date")?)?;
            let window = TimeWindow::for_dates(start, end)?;
            Ok((window, format!("{} to {}", start, end)))
        }
        other => Err(ServerError::invalid_arguments(format!(
            "unknown time_range '{}'",
            other
        ))),
    }
}

fn max_results(args: &Map<String, Value>) -> ServerResult<usize> {
    match optional_i64(args, "max_results")? {
        None => Ok(DEFAULT_MAX_RESULTS),
        Some(n) if n > 0 => Ok(n as usize),
        Some(_) => Err(ServerError::invalid_arguments(
            "'max_results' must be positive",
        )),
    }
}

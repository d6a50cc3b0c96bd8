//! Time types for calendar queries.
//!
//! Provides [`EventTime`] for event start/end times (a specific datetime or an
//! all-day date), [`TimeWindow`] for query ranges with named-range
//! constructors, and a lenient parser for user-supplied datetime strings.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{CoreError, CoreResult};

/// Represents the time of a calendar event.
///
/// Calendar events carry either a specific point in time (stored as UTC) or a
/// bare date for all-day events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A specific datetime, stored in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day event date (no specific time).
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a new `EventTime::DateTime` from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a new `EventTime::DateTime` from a datetime in any timezone.
    pub fn from_local<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.with_timezone(&Utc))
    }

    /// Creates a new `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the datetime if this is a `DateTime` variant.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            Self::AllDay(_) => None,
        }
    }

    /// Converts to a UTC datetime for comparison purposes.
    ///
    /// All-day events are pinned to midnight UTC on their date.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => *dt,
            Self::AllDay(date) => date.and_hms_opt(0, 0, 0).expect("valid time").and_utc(),
        }
    }

    /// Returns the date portion of this event time.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.date_naive(),
            Self::AllDay(date) => *date,
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_utc_datetime().cmp(&other.to_utc_datetime())
    }
}

/// A time window for querying calendar events.
///
/// Represents a half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window, rejecting inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::validation(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The remainder of the current UTC day: `[now, next midnight)`.
    pub fn today(now: DateTime<Utc>) -> Self {
        Self {
            start: now,
            end: next_midnight(now),
        }
    }

    /// The whole of the next UTC day.
    pub fn tomorrow(now: DateTime<Utc>) -> Self {
        let start = next_midnight(now);
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// From now until the coming Monday at midnight UTC.
    pub fn this_week(now: DateTime<Utc>) -> Self {
        Self {
            start: now,
            end: next_monday(now),
        }
    }

    /// The seven days starting at the coming Monday, midnight UTC.
    pub fn next_week(now: DateTime<Utc>) -> Self {
        let start = next_monday(now);
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    /// From now, extending the given number of days.
    pub fn days_ahead(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now,
            end: now + Duration::days(days),
        }
    }

    /// A window spanning whole UTC days: `[start_date 00:00, day after end_date 00:00)`.
    pub fn for_dates(start_date: NaiveDate, end_date: NaiveDate) -> CoreResult<Self> {
        let start = start_date.and_hms_opt(0, 0, 0).expect("valid time").and_utc();
        let end = end_date
            .succ_opt()
            .ok_or_else(|| CoreError::validation("end date out of range"))?
            .and_hms_opt(0, 0, 0)
            .expect("valid time")
            .and_utc();
        Self::new(start, end)
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }
}

fn next_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .succ_opt()
        .expect("valid successor date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
        .and_utc()
}

fn next_monday(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let days_until = 7 - today.weekday().num_days_from_monday() as i64;
    (today + Duration::days(days_until))
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
        .and_utc()
}

/// Accepted formats for [`parse_datetime_input`], tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
];

/// Parses a user-supplied datetime string into UTC.
///
/// Accepts RFC 3339 (offset honored) and a handful of naive formats which are
/// interpreted as UTC. A bare `YYYY-MM-DD` parses as midnight UTC.
pub fn parse_datetime_input(input: &str) -> CoreResult<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).expect("valid time").and_utc());
    }

    Err(CoreError::DateTimeParse(trimmed.to_string()))
}

/// Parses a bare `YYYY-MM-DD` date string.
pub fn parse_date_input(input: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::DateTimeParse(input.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod event_time {
        use super::*;

        #[test]
        fn datetime_creation() {
            let dt = utc(2025, 2, 5, 10, 30, 0);
            let et = EventTime::from_utc(dt);
            assert!(!et.is_all_day());
            assert_eq!(et.as_datetime(), Some(&dt));
        }

        #[test]
        fn allday_creation() {
            let d = date(2025, 2, 5);
            let et = EventTime::from_date(d);
            assert!(et.is_all_day());
            assert_eq!(et.as_datetime(), None);
            assert_eq!(et.date(), d);
        }

        #[test]
        fn to_utc_datetime() {
            let dt = utc(2025, 2, 5, 10, 30, 0);
            assert_eq!(EventTime::from_utc(dt).to_utc_datetime(), dt);
            assert_eq!(
                EventTime::from_date(date(2025, 2, 5)).to_utc_datetime(),
                utc(2025, 2, 5, 0, 0, 0)
            );
        }

        #[test]
        fn ordering() {
            let et1 = EventTime::from_utc(utc(2025, 2, 5, 10, 0, 0));
            let et2 = EventTime::from_utc(utc(2025, 2, 5, 11, 0, 0));
            let et3 = EventTime::from_date(date(2025, 2, 5));

            assert!(et3 < et1); // midnight < 10:00
            assert!(et1 < et2);
        }

        #[test]
        fn serde_roundtrip() {
            let et = EventTime::from_utc(utc(2025, 2, 5, 10, 30, 0));
            let json = serde_json::to_string(&et).unwrap();
            let parsed: EventTime = serde_json::from_str(&json).unwrap();
            assert_eq!(et, parsed);
        }
    }

    mod time_window {
        use super::*;

        #[test]
        fn creation() {
            let start = utc(2025, 2, 5, 9, 0, 0);
            let end = utc(2025, 2, 5, 17, 0, 0);
            let window = TimeWindow::new(start, end).unwrap();
            assert_eq!(window.duration(), Duration::hours(8));
        }

        #[test]
        fn inverted_window_rejected() {
            let start = utc(2025, 2, 5, 17, 0, 0);
            let end = utc(2025, 2, 5, 9, 0, 0);
            assert!(matches!(
                TimeWindow::new(start, end),
                Err(CoreError::Validation(_))
            ));
        }

        #[test]
        fn contains_half_open() {
            let window =
                TimeWindow::new(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0)).unwrap();
            assert!(window.contains(utc(2025, 2, 5, 9, 0, 0)));
            assert!(window.contains(utc(2025, 2, 5, 16, 59, 59)));
            assert!(!window.contains(utc(2025, 2, 5, 17, 0, 0)));
            assert!(!window.contains(utc(2025, 2, 5, 8, 59, 59)));
        }

        #[test]
        fn today_runs_until_midnight() {
            let now = utc(2025, 2, 5, 14, 30, 0);
            let window = TimeWindow::today(now);
            assert_eq!(window.start, now);
            assert_eq!(window.end, utc(2025, 2, 6, 0, 0, 0));
        }

        #[test]
        fn tomorrow_covers_full_day() {
            let window = TimeWindow::tomorrow(utc(2025, 2, 5, 14, 30, 0));
            assert_eq!(window.start, utc(2025, 2, 6, 0, 0, 0));
            assert_eq!(window.end, utc(2025, 2, 7, 0, 0, 0));
        }

        #[test]
        fn week_windows() {
            // 2025-02-05 is a Wednesday; next Monday is 2025-02-10.
            let now = utc(2025, 2, 5, 14, 30, 0);
            let this_week = TimeWindow::this_week(now);
            assert_eq!(this_week.start, now);
            assert_eq!(this_week.end, utc(2025, 2, 10, 0, 0, 0));

            let next_week = TimeWindow::next_week(now);
            assert_eq!(next_week.start, utc(2025, 2, 10, 0, 0, 0));
            assert_eq!(next_week.end, utc(2025, 2, 17, 0, 0, 0));
        }

        #[test]
        fn week_windows_from_monday() {
            // Starting on a Monday still rolls to the following Monday.
            let now = utc(2025, 2, 10, 8, 0, 0);
            let this_week = TimeWindow::this_week(now);
            assert_eq!(this_week.end, utc(2025, 2, 17, 0, 0, 0));
        }

        #[test]
        fn days_ahead() {
            let now = utc(2025, 2, 5, 14, 30, 0);
            let window = TimeWindow::days_ahead(now, 7);
            assert_eq!(window.start, now);
            assert_eq!(window.end, utc(2025, 2, 12, 14, 30, 0));
        }

        #[test]
        fn for_dates_is_inclusive_of_end_date() {
            let window = TimeWindow::for_dates(date(2025, 2, 5), date(2025, 2, 7)).unwrap();
            assert_eq!(window.start, utc(2025, 2, 5, 0, 0, 0));
            assert_eq!(window.end, utc(2025, 2, 8, 0, 0, 0));
        }

        #[test]
        fn for_dates_rejects_inverted_range() {
            assert!(TimeWindow::for_dates(date(2025, 2, 7), date(2025, 2, 5)).is_err());
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn rfc3339_with_offset() {
            let dt = parse_datetime_input("2025-02-05T10:30:00+02:00").unwrap();
            assert_eq!(dt, utc(2025, 2, 5, 8, 30, 0));
        }

        #[test]
        fn naive_formats_are_utc() {
            assert_eq!(
                parse_datetime_input("2025-02-05 10:30").unwrap(),
                utc(2025, 2, 5, 10, 30, 0)
            );
            assert_eq!(
                parse_datetime_input("2025-02-05T10:30:00").unwrap(),
                utc(2025, 2, 5, 10, 30, 0)
            );
            assert_eq!(
                parse_datetime_input("2025-02-05 02:30 PM").unwrap(),
                utc(2025, 2, 5, 14, 30, 0)
            );
        }

        #[test]
        fn bare_date_is_midnight() {
            assert_eq!(
                parse_datetime_input("2025-02-05").unwrap(),
                utc(2025, 2, 5, 0, 0, 0)
            );
        }

        #[test]
        fn garbage_is_rejected() {
            assert!(matches!(
                parse_datetime_input("next thursday-ish"),
                Err(CoreError::DateTimeParse(_))
            ));
        }

        #[test]
        fn date_input() {
            assert_eq!(parse_date_input(" 2025-02-05 ").unwrap(), date(2025, 2, 5));
            assert!(parse_date_input("05/02/2025").is_err());
        }
    }
}

//! Free/busy slot search.
//!
//! [`find_free_slots`] scans the gaps between busy intervals inside a query
//! window and keeps the ones long enough to hold a meeting, optionally
//! restricted to working hours. The scan is a fold over the sorted intervals
//! with an advancing cursor, so overlapping and nested intervals collapse
//! naturally into their union.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::time::TimeWindow;

/// A half-open `[start, end)` range during which the calendar owner is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.start > self.end {
            return Err(CoreError::validation(format!(
                "busy interval starts at {} but ends at {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// A gap that satisfied the duration and work-hours constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Constraints applied to candidate gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConstraints {
    /// Minimum gap length to report, in minutes.
    pub min_duration_minutes: i64,
    /// When set, a gap qualifies only if its start hour falls in
    /// `[work_start_hour, work_end_hour)`.
    pub work_hours_only: bool,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    /// Stricter work-hours filter: the gap's end must also land inside work
    /// hours on the same day. Off by default; the historical behavior checks
    /// the start hour only.
    pub full_span_in_work_hours: bool,
}

impl Default for SlotConstraints {
    fn default() -> Self {
        Self {
            min_duration_minutes: 60,
            work_hours_only: false,
            work_start_hour: 9,
            work_end_hour: 17,
            full_span_in_work_hours: false,
        }
    }
}

impl SlotConstraints {
    /// Sets the minimum slot duration in minutes.
    #[must_use]
    pub fn with_min_duration(mut self, minutes: i64) -> Self {
        self.min_duration_minutes = minutes;
        self
    }

    /// Restricts slots to the given working hours (start hour inclusive,
    /// end hour exclusive).
    #[must_use]
    pub fn with_work_hours(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.work_hours_only = true;
        self.work_start_hour = start_hour;
        self.work_end_hour = end_hour;
        self
    }

    /// Requires the whole slot to sit inside working hours, not just its start.
    #[must_use]
    pub fn with_full_span_in_work_hours(mut self) -> Self {
        self.full_span_in_work_hours = true;
        self
    }

    fn validate(&self) -> CoreResult<()> {
        if self.min_duration_minutes <= 0 {
            return Err(CoreError::validation(format!(
                "minimum duration must be positive, got {}",
                self.min_duration_minutes
            )));
        }
        if self.work_start_hour > 23 || self.work_end_hour > 24 {
            return Err(CoreError::validation(format!(
                "work hours {}..{} out of range",
                self.work_start_hour, self.work_end_hour
            )));
        }
        if self.work_hours_only && self.work_start_hour >= self.work_end_hour {
            return Err(CoreError::validation(format!(
                "work start hour {} is not before end hour {}",
                self.work_start_hour, self.work_end_hour
            )));
        }
        Ok(())
    }
}

/// Finds the free slots between busy intervals inside `window`.
///
/// Intervals are sorted by start time if they do not arrive sorted. A cursor
/// begins at `window.start`; each interval whose start lies beyond the cursor
/// opens a candidate gap `[cursor, interval.start)`, after which the cursor
/// jumps to `max(cursor, interval.end)` so it never moves backwards. The gap
/// between the final cursor position and `window.end` is evaluated the same
/// way. Results come back in chronological order.
///
/// Intervals with `start > end` are rejected with
/// [`CoreError::Validation`], never silently reordered. A minimum duration
/// larger than every gap yields an empty result, not an error.
pub fn find_free_slots(
    busy: &[BusyInterval],
    window: &TimeWindow,
    constraints: &SlotConstraints,
) -> CoreResult<Vec<FreeSlot>> {
    constraints.validate()?;
    if window.start > window.end {
        return Err(CoreError::validation(format!(
            "window start {} is after end {}",
            window.start, window.end
        )));
    }
    for interval in busy {
        interval.validate()?;
    }

    let mut intervals = busy.to_vec();
    intervals.sort_by_key(|interval| interval.start);

    let (cursor, mut slots) = intervals.iter().fold(
        (window.start, Vec::new()),
        |(cursor, mut slots), interval| {
            let gap_end = interval.start.min(window.end);
            if gap_end > cursor {
                if let Some(slot) = evaluate_gap(cursor, gap_end, constraints) {
                    slots.push(slot);
                }
            }
            (cursor.max(interval.end), slots)
        },
    );

    // Trailing gap after the last busy interval.
    if window.end > cursor {
        if let Some(slot) = evaluate_gap(cursor, window.end, constraints) {
            slots.push(slot);
        }
    }

    tracing::debug!(
        busy = busy.len(),
        found = slots.len(),
        "free-slot scan complete"
    );
    Ok(slots)
}

fn evaluate_gap(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    constraints: &SlotConstraints,
) -> Option<FreeSlot> {
    let duration_minutes = (end - start).num_minutes();
    if duration_minutes < constraints.min_duration_minutes {
        return None;
    }
    if constraints.work_hours_only {
        let start_hour = start.hour();
        if start_hour < constraints.work_start_hour || start_hour >= constraints.work_end_hour {
            return None;
        }
        if constraints.full_span_in_work_hours && !ends_within_work_hours(start, end, constraints) {
            return None;
        }
    }
    Some(FreeSlot {
        start,
        end,
        duration_minutes,
    })
}

fn ends_within_work_hours(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    constraints: &SlotConstraints,
) -> bool {
    if end.date_naive() != start.date_naive() {
        return false;
    }
    let end_hour = end.hour();
    // Ending exactly on the closing hour is allowed.
    end_hour < constraints.work_end_hour
        || (end_hour == constraints.work_end_hour && end.minute() == 0 && end.second() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeWindow {
        TimeWindow::new(start, end).unwrap()
    }

    fn busy(start: DateTime<Utc>, end: DateTime<Utc>) -> BusyInterval {
        BusyInterval::new(start, end)
    }

    fn any_duration() -> SlotConstraints {
        SlotConstraints::default().with_min_duration(1)
    }

    #[test]
    fn empty_busy_list_yields_whole_window() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let slots = find_free_slots(&[], &w, &any_duration()).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, w.start);
        assert_eq!(slots[0].end, w.end);
        assert_eq!(slots[0].duration_minutes, 480);
    }

    #[test]
    fn gaps_between_intervals() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let b = [
            busy(utc(2025, 2, 5, 10, 0, 0), utc(2025, 2, 5, 11, 0, 0)),
            busy(utc(2025, 2, 5, 13, 0, 0), utc(2025, 2, 5, 14, 0, 0)),
        ];
        let slots = find_free_slots(&b, &w, &any_duration()).unwrap();
        let bounds: Vec<_> = slots.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 10, 0, 0)),
                (utc(2025, 2, 5, 11, 0, 0), utc(2025, 2, 5, 13, 0, 0)),
                (utc(2025, 2, 5, 14, 0, 0), utc(2025, 2, 5, 17, 0, 0)),
            ]
        );
    }

    #[test]
    fn slots_never_overlap_busy_intervals() {
        let w = window(utc(2025, 2, 5, 8, 0, 0), utc(2025, 2, 5, 18, 0, 0));
        let b = [
            busy(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 12, 0, 0)),
            busy(utc(2025, 2, 5, 10, 0, 0), utc(2025, 2, 5, 11, 0, 0)),
            busy(utc(2025, 2, 5, 11, 30, 0), utc(2025, 2, 5, 13, 0, 0)),
        ];
        let slots = find_free_slots(&b, &w, &any_duration()).unwrap();
        for slot in &slots {
            for interval in &b {
                assert!(
                    slot.end <= interval.start || slot.start >= interval.end,
                    "slot {slot:?} overlaps {interval:?}"
                );
            }
        }
    }

    #[test]
    fn all_slots_meet_minimum_duration() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let b = [
            busy(utc(2025, 2, 5, 9, 30, 0), utc(2025, 2, 5, 10, 0, 0)),
            busy(utc(2025, 2, 5, 10, 45, 0), utc(2025, 2, 5, 12, 0, 0)),
        ];
        let constraints = SlotConstraints::default().with_min_duration(60);
        let slots = find_free_slots(&b, &w, &constraints).unwrap();
        assert!(slots.iter().all(|s| s.duration_minutes >= 60));
        // The 30- and 45-minute gaps are dropped; only 12:00-17:00 survives.
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, utc(2025, 2, 5, 12, 0, 0));
    }

    #[test]
    fn slots_are_chronological() {
        let w = window(utc(2025, 2, 5, 0, 0, 0), utc(2025, 2, 7, 0, 0, 0));
        let b = [
            busy(utc(2025, 2, 6, 10, 0, 0), utc(2025, 2, 6, 11, 0, 0)),
            busy(utc(2025, 2, 5, 10, 0, 0), utc(2025, 2, 5, 11, 0, 0)),
            busy(utc(2025, 2, 5, 15, 0, 0), utc(2025, 2, 5, 16, 0, 0)),
        ];
        let slots = find_free_slots(&b, &w, &any_duration()).unwrap();
        assert!(slots.windows(2).all(|pair| pair[0].end <= pair[1].start));
    }

    #[test]
    fn unsorted_input_matches_sorted_input() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let sorted = [
            busy(utc(2025, 2, 5, 10, 0, 0), utc(2025, 2, 5, 11, 0, 0)),
            busy(utc(2025, 2, 5, 13, 0, 0), utc(2025, 2, 5, 14, 0, 0)),
        ];
        let shuffled = [sorted[1], sorted[0]];
        let constraints = any_duration();
        assert_eq!(
            find_free_slots(&sorted, &w, &constraints).unwrap(),
            find_free_slots(&shuffled, &w, &constraints).unwrap()
        );
    }

    #[test]
    fn fully_booked_window_yields_nothing() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let b = [busy(utc(2025, 2, 5, 8, 0, 0), utc(2025, 2, 5, 18, 0, 0))];
        assert!(find_free_slots(&b, &w, &any_duration()).unwrap().is_empty());
    }

    #[test]
    fn overlapping_intervals_collapse() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let b = [
            busy(utc(2025, 2, 5, 10, 0, 0), utc(2025, 2, 5, 12, 0, 0)),
            busy(utc(2025, 2, 5, 11, 0, 0), utc(2025, 2, 5, 13, 0, 0)),
            // Nested inside the first.
            busy(utc(2025, 2, 5, 10, 30, 0), utc(2025, 2, 5, 11, 30, 0)),
        ];
        let slots = find_free_slots(&b, &w, &any_duration()).unwrap();
        let bounds: Vec<_> = slots.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 10, 0, 0)),
                (utc(2025, 2, 5, 13, 0, 0), utc(2025, 2, 5, 17, 0, 0)),
            ]
        );
    }

    #[test]
    fn interval_straddling_window_start_does_not_regress_cursor() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let b = [busy(utc(2025, 2, 5, 7, 0, 0), utc(2025, 2, 5, 10, 0, 0))];
        let slots = find_free_slots(&b, &w, &any_duration()).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, utc(2025, 2, 5, 10, 0, 0));
        assert_eq!(slots[0].end, utc(2025, 2, 5, 17, 0, 0));
    }

    #[test]
    fn interval_beyond_window_end_is_clipped() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let b = [busy(utc(2025, 2, 5, 18, 0, 0), utc(2025, 2, 5, 19, 0, 0))];
        let slots = find_free_slots(&b, &w, &any_duration()).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].end, utc(2025, 2, 5, 17, 0, 0));
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let b = [busy(utc(2025, 2, 5, 12, 0, 0), utc(2025, 2, 5, 10, 0, 0))];
        assert!(matches!(
            find_free_slots(&b, &w, &any_duration()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn zero_length_window_is_valid_and_empty() {
        let at = utc(2025, 2, 5, 9, 0, 0);
        let w = window(at, at);
        assert!(find_free_slots(&[], &w, &any_duration()).unwrap().is_empty());
    }

    #[test]
    fn oversized_minimum_duration_yields_empty_not_error() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let constraints = SlotConstraints::default().with_min_duration(600);
        assert!(find_free_slots(&[], &w, &constraints).unwrap().is_empty());
    }

    #[test]
    fn non_positive_minimum_duration_is_rejected() {
        let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
        let constraints = SlotConstraints::default().with_min_duration(0);
        assert!(find_free_slots(&[], &w, &constraints).is_err());
    }

    mod work_hours {
        use super::*;

        #[test]
        fn start_hour_outside_work_hours_is_dropped() {
            let w = window(utc(2025, 2, 5, 6, 0, 0), utc(2025, 2, 5, 8, 0, 0));
            let constraints = any_duration().with_work_hours(9, 17);
            assert!(find_free_slots(&[], &w, &constraints).unwrap().is_empty());
        }

        #[test]
        fn start_hour_boundaries() {
            let constraints = any_duration().with_work_hours(9, 17);

            // Starting exactly at the opening hour qualifies.
            let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 10, 0, 0));
            assert_eq!(find_free_slots(&[], &w, &constraints).unwrap().len(), 1);

            // Starting at the closing hour does not.
            let w = window(utc(2025, 2, 5, 17, 0, 0), utc(2025, 2, 5, 18, 0, 0));
            assert!(find_free_slots(&[], &w, &constraints).unwrap().is_empty());
        }

        #[test]
        fn default_check_ignores_the_slot_end() {
            // Starts inside work hours, runs far past them. The lenient
            // default keeps it.
            let w = window(utc(2025, 2, 5, 16, 0, 0), utc(2025, 2, 5, 22, 0, 0));
            let constraints = any_duration().with_work_hours(9, 17);
            assert_eq!(find_free_slots(&[], &w, &constraints).unwrap().len(), 1);
        }

        #[test]
        fn full_span_check_drops_slots_running_past_closing() {
            let constraints = any_duration()
                .with_work_hours(9, 17)
                .with_full_span_in_work_hours();

            let w = window(utc(2025, 2, 5, 16, 0, 0), utc(2025, 2, 5, 22, 0, 0));
            assert!(find_free_slots(&[], &w, &constraints).unwrap().is_empty());

            // Ending exactly at the closing hour is still fine.
            let w = window(utc(2025, 2, 5, 16, 0, 0), utc(2025, 2, 5, 17, 0, 0));
            assert_eq!(find_free_slots(&[], &w, &constraints).unwrap().len(), 1);
        }

        #[test]
        fn invalid_work_hours_are_rejected() {
            let w = window(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));
            let constraints = any_duration().with_work_hours(17, 9);
            assert!(find_free_slots(&[], &w, &constraints).is_err());
        }
    }
}

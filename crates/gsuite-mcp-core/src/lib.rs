//! Core types and the free-slot search for gsuite-mcp.
//!
//! Everything here is pure: no I/O, no clocks, no API calls. Callers fetch
//! busy intervals however they like and hand them to [`find_free_slots`].

pub mod error;
pub mod slots;
pub mod time;
pub mod tracing;

pub use error::{CoreError, CoreResult};
pub use slots::{BusyInterval, FreeSlot, SlotConstraints, find_free_slots};
pub use time::{EventTime, TimeWindow, parse_date_input, parse_datetime_input};

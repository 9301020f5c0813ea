//! Time slots and course placements.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::weeks::parse_weeks;

/// A named interval of the day shared across all weekdays, e.g.
/// "1st period, 08:00-08:45".
///
/// `start`/`end` keep their `HH:MM` wire encoding; use [`TimeSlot::start_time`]
/// and [`TimeSlot::end_time`] for the parsed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Period index, unique within a document.
    pub idx: u8,
    /// Start of the interval, `HH:MM`.
    pub start: String,
    /// End of the interval, `HH:MM`.
    pub end: String,
}

impl TimeSlot {
    pub fn new(idx: u8, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            idx,
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parsed start time, `None` when the stored string is not `HH:MM`.
    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_hhmm(&self.start)
    }

    /// Parsed end time, `None` when the stored string is not `HH:MM`.
    pub fn end_time(&self) -> Option<NaiveTime> {
        parse_hhmm(&self.end)
    }
}

/// Parse a `HH:MM` string into a [`NaiveTime`].
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Week-parity filter restricting a course to odd or even week numbers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekType {
    #[default]
    All,
    Odd,
    Even,
}

impl WeekType {
    /// Whether this parity admits the given week number.
    pub fn admits(self, week_no: u32) -> bool {
        match self {
            WeekType::All => true,
            WeekType::Odd => week_no % 2 == 1,
            WeekType::Even => week_no % 2 == 0,
        }
    }
}

/// One recurring course entry: a weekday, the periods it occupies, and its
/// week membership (range string plus optional parity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursePlacement {
    pub name: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub room: String,
    /// ISO weekday, 1 = Monday .. 7 = Sunday.
    pub day: u8,
    /// Period indices occupied on that day; non-empty, referencing slot `idx`
    /// values.
    pub periods: Vec<u8>,
    /// Week membership in the compact wire syntax, e.g. `"01-16"`.
    pub weeks: String,
    pub week_type: WeekType,
    #[serde(default)]
    pub note: String,
}

impl CoursePlacement {
    /// The active-in-week predicate: true iff `week_no` is a member of
    /// `weeks` and the parity filter admits it.
    pub fn active_in_week(&self, week_no: u32) -> bool {
        parse_weeks(&self.weeks).contains(&week_no) && self.week_type.admits(week_no)
    }

    /// Whether this placement occupies the given period index.
    pub fn occupies_period(&self, idx: u8) -> bool {
        self.periods.contains(&idx)
    }
}

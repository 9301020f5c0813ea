//! Public API surface for the classtable backend.
//!
//! This file consolidates the DTO types shared by the service layer and the
//! HTTP API. All types derive Serialize/Deserialize for JSON serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use crate::models::{
    CoursePlacement, DisplayField, ScheduleDocument, SharedLink, TimeSlot, TzMode, WeekType,
};

/// User account identifier (the numeric ID users register with).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// A (weekday, period) coordinate in the schedule grid.
///
/// `day` uses ISO numbering (1 = Monday .. 7 = Sunday); `period` is the
/// owning time slot's `idx`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub day: u8,
    pub period: u8,
}

impl Cell {
    pub fn new(day: u8, period: u8) -> Self {
        Self { day, period }
    }
}

/// Result of one occurrence query against a schedule document.
///
/// Ephemeral - recomputed on every display refresh, never persisted.
/// `week_no == 0` means the schedule has not started yet (or has no start
/// date); in that case the highlight sets are empty and only the grid is
/// populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceSnapshot {
    /// 1-based week number relative to the document's start date, 0 if the
    /// schedule has not started.
    pub week_no: u32,
    /// Cells with a class interval covering the query instant.
    pub current_cells: Vec<Cell>,
    /// Placements live in the current cells this week.
    pub current_courses: Vec<CoursePlacement>,
    /// Cells whose slot starts within the 15-minute lookahead window.
    pub next_cells: Vec<Cell>,
    /// Start instant of the next slot as epoch milliseconds, for countdown
    /// rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_deadline_ms: Option<i64>,
    /// Start of the next slot formatted `HH:MM` in the display timezone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_start_hhmm: Option<String>,
    /// Placements about to begin in the next cells this week.
    pub upcoming_courses: Vec<CoursePlacement>,
    /// Full grid: day -> period -> active placements, in document order.
    pub grid: BTreeMap<u8, BTreeMap<u8, Vec<CoursePlacement>>>,
}

impl OccurrenceSnapshot {
    /// Snapshot for a document that has no usable start date: grid only,
    /// no highlight metadata.
    pub fn not_started(grid: BTreeMap<u8, BTreeMap<u8, Vec<CoursePlacement>>>) -> Self {
        Self {
            week_no: 0,
            current_cells: Vec::new(),
            current_courses: Vec::new(),
            next_cells: Vec::new(),
            next_deadline_ms: None,
            next_start_hhmm: None,
            upcoming_courses: Vec::new(),
            grid,
        }
    }
}

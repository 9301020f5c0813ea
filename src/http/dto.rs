//! Data Transfer Objects for the HTTP API.
//!
//! The occurrence snapshot and model types already derive
//! Serialize/Deserialize and go over the wire as-is; this module adds the
//! request envelopes and the field-filtered shapes the share page sees.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Cell, OccurrenceSnapshot};
use crate::models::{CoursePlacement, DisplayField, SharedLink, TimeSlot, TzMode};

/// Request body for replacing a user's schedule document.
///
/// The document travels as raw JSON so that the ingestion path (empty
/// start_date tolerance, period clamping) stays in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScheduleRequest {
    /// The schedule document, in its stored JSON encoding.
    pub schedule: serde_json::Value,
}

/// Response for a successful save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScheduleResponse {
    pub message: String,
}

/// Query parameters for the occurrence endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccurrenceQueryParams {
    /// Show every week, ignoring week/parity filters.
    #[serde(default)]
    pub all: Option<bool>,
    /// Display timezone override (IANA name).
    #[serde(default)]
    pub tz: Option<String>,
    /// Resolve at this instant (RFC 3339) instead of the server clock.
    #[serde(default)]
    pub at: Option<String>,
}

/// Request body for importing courses from pasted CSV text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCoursesRequest {
    pub text: String,
}

/// Parsed courses, returned to the editor for review before saving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCoursesResponse {
    pub courses: Vec<CoursePlacement>,
    pub total: usize,
}

/// Request body for publishing a share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// 4-digit access code viewers must present.
    pub share_pass: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_visits: Option<u32>,
    /// Course fields to expose; defaults to name/teacher/room.
    #[serde(default)]
    pub display_fields: Option<Vec<DisplayField>>,
    #[serde(default)]
    pub tz_mode: Option<TzMode>,
    /// IANA name used by the fixed/custom timezone modes.
    #[serde(default)]
    pub tz_value: Option<String>,
}

/// Response for share-link creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareResponse {
    pub token: String,
    pub message: String,
}

/// Query parameters for the public share view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareViewQuery {
    /// The 4-digit access code.
    #[serde(default)]
    pub p: Option<String>,
    /// Show every week, ignoring week/parity filters.
    #[serde(default)]
    pub all: Option<bool>,
}

/// A course as the share page sees it: only the fields the owner chose to
/// expose. `note` is never shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedCourse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<String>,
    pub day: u8,
    pub periods: Vec<u8>,
}

impl SharedCourse {
    pub fn from_placement(course: &CoursePlacement, link: &SharedLink) -> Self {
        let keep = |field: DisplayField, value: &str| {
            link.shows(field).then(|| value.to_string())
        };
        Self {
            name: keep(DisplayField::Name, &course.name),
            teacher: keep(DisplayField::Teacher, &course.teacher),
            room: keep(DisplayField::Room, &course.room),
            weeks: keep(DisplayField::Weeks, &course.weeks),
            day: course.day,
            periods: course.periods.clone(),
        }
    }
}

/// Occurrence snapshot with course fields filtered for a share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedSnapshot {
    pub week_no: u32,
    pub current_cells: Vec<Cell>,
    pub current_courses: Vec<SharedCourse>,
    pub next_cells: Vec<Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_deadline_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_start_hhmm: Option<String>,
    pub upcoming_courses: Vec<SharedCourse>,
    pub grid: BTreeMap<u8, BTreeMap<u8, Vec<SharedCourse>>>,
}

impl SharedSnapshot {
    pub fn from_snapshot(snapshot: OccurrenceSnapshot, link: &SharedLink) -> Self {
        let filter =
            |courses: &[CoursePlacement]| -> Vec<SharedCourse> {
                courses
                    .iter()
                    .map(|c| SharedCourse::from_placement(c, link))
                    .collect()
            };
        let grid = snapshot
            .grid
            .iter()
            .map(|(day, row)| {
                let row = row
                    .iter()
                    .map(|(period, courses)| (*period, filter(courses)))
                    .collect();
                (*day, row)
            })
            .collect();
        Self {
            week_no: snapshot.week_no,
            current_cells: snapshot.current_cells,
            current_courses: filter(&snapshot.current_courses),
            next_cells: snapshot.next_cells,
            next_deadline_ms: snapshot.next_deadline_ms,
            next_start_hhmm: snapshot.next_start_hhmm,
            upcoming_courses: filter(&snapshot.upcoming_courses),
            grid,
        }
    }
}

/// Everything the share page needs to render one visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareViewResponse {
    /// Weekdays shown in the grid.
    pub enabled_days: Vec<u8>,
    /// Slot definitions, for row labels and live client-side highlighting.
    pub timeslots: Vec<TimeSlot>,
    /// Fields the owner chose to expose.
    pub display_fields: Vec<DisplayField>,
    /// Timezone the page should render clocks in (IANA name).
    pub display_tz: String,
    pub snapshot: SharedSnapshot,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub storage: String,
}

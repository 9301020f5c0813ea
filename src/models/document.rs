//! The schedule document: the JSON blob owned by one user account.
//!
//! Documents are created empty at registration, fully replaced (never merged)
//! on every save, and destroyed by the account's clear-schedule operation.
//! Last write wins; there is no concurrent-editor coordination.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::course::{CoursePlacement, TimeSlot};

/// Recurrence timezone used when a stored document carries none.
pub const DEFAULT_TZ: Tz = chrono_tz::Asia::Shanghai;

fn default_tz() -> Tz {
    DEFAULT_TZ
}

fn default_enabled_days() -> Vec<u8> {
    vec![1, 2, 3, 4, 5]
}

/// A user's weekly recurrence schedule.
///
/// `tz` is the authoritative recurrence timezone: week numbers and weekday
/// membership are always computed in it, whatever timezone a viewer renders
/// in. `start_date` is interpreted as local midnight in `tz`; `None` means
/// the document is still mid-setup and occurrence resolution degrades to
/// week 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    /// First day of week 1 (`YYYY-MM-DD` on the wire), if configured.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// IANA recurrence timezone.
    #[serde(default = "default_tz")]
    pub tz: Tz,
    /// Weekdays shown in the grid, ISO 1..=7.
    #[serde(default = "default_enabled_days")]
    pub enabled_days: Vec<u8>,
    /// Period definitions, unique `idx` per slot.
    #[serde(default)]
    pub timeslots: Vec<TimeSlot>,
    /// Course placements, in user-visible order.
    #[serde(default)]
    pub courses: Vec<CoursePlacement>,
}

impl Default for ScheduleDocument {
    fn default() -> Self {
        Self {
            start_date: None,
            tz: DEFAULT_TZ,
            enabled_days: default_enabled_days(),
            timeslots: Vec::new(),
            courses: Vec::new(),
        }
    }
}

impl ScheduleDocument {
    /// Highest slot index currently defined, or `None` while the document
    /// has no timeslots (periods are then unbounded).
    pub fn max_period_idx(&self) -> Option<u8> {
        self.timeslots.iter().map(|t| t.idx).max()
    }

    /// Slot owning the given period index, if any.
    pub fn slot(&self, idx: u8) -> Option<&TimeSlot> {
        self.timeslots.iter().find(|t| t.idx == idx)
    }
}

/// Parse a schedule document from its stored JSON encoding.
///
/// Tolerates the quirks of documents written by older clients: an empty
/// `start_date` string is treated as unset, and course period lists are
/// clamped to the document's known slot indices on the way in. Unknown
/// timezone names and malformed dates are rejected here, before any
/// occurrence computation can see them.
pub fn parse_document_json_str(json: &str) -> Result<ScheduleDocument> {
    let mut value: serde_json::Value =
        serde_json::from_str(json).context("Invalid schedule JSON")?;

    let obj = value
        .as_object_mut()
        .context("Schedule JSON must be an object")?;
    // Mid-setup documents store start_date as "".
    if matches!(obj.get("start_date"), Some(serde_json::Value::String(s)) if s.is_empty()) {
        obj.insert("start_date".to_string(), serde_json::Value::Null);
    }

    let mut doc: ScheduleDocument =
        serde_json::from_value(value).context("Failed to deserialize schedule document")?;

    // Ingestion clamp: periods may only reference slots that exist.
    if let Some(max_idx) = doc.max_period_idx() {
        for course in &mut doc.courses {
            course.periods.retain(|p| (1..=max_idx).contains(p));
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekType;

    fn sample_json() -> &'static str {
        r#"{
            "start_date": "2024-09-02",
            "tz": "Asia/Shanghai",
            "enabled_days": [1, 2, 3, 4, 5],
            "timeslots": [
                {"idx": 1, "start": "08:00", "end": "08:45"},
                {"idx": 2, "start": "08:55", "end": "09:40"}
            ],
            "courses": [
                {
                    "name": "Calculus",
                    "teacher": "Prof. Zhao",
                    "room": "C-101",
                    "day": 1,
                    "periods": [1, 2],
                    "weeks": "01-16",
                    "week_type": "all",
                    "note": ""
                }
            ]
        }"#
    }

    #[test]
    fn test_parse_full_document() {
        let doc = parse_document_json_str(sample_json()).unwrap();
        assert_eq!(
            doc.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())
        );
        assert_eq!(doc.tz, chrono_tz::Asia::Shanghai);
        assert_eq!(doc.timeslots.len(), 2);
        assert_eq!(doc.courses.len(), 1);
        assert_eq!(doc.courses[0].week_type, WeekType::All);
    }

    #[test]
    fn test_parse_empty_start_date_is_unset() {
        let doc = parse_document_json_str(r#"{"start_date": "", "tz": "UTC"}"#).unwrap();
        assert!(doc.start_date.is_none());
        assert_eq!(doc.tz, chrono_tz::UTC);
    }

    #[test]
    fn test_parse_defaults() {
        let doc = parse_document_json_str("{}").unwrap();
        assert!(doc.start_date.is_none());
        assert_eq!(doc.tz, DEFAULT_TZ);
        assert_eq!(doc.enabled_days, vec![1, 2, 3, 4, 5]);
        assert!(doc.timeslots.is_empty());
        assert!(doc.courses.is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_timezone() {
        let result = parse_document_json_str(r#"{"tz": "Mars/Olympus_Mons"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_date() {
        let result = parse_document_json_str(r#"{"start_date": "02/09/2024"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_document_json_str("[1,2,3]").is_err());
        assert!(parse_document_json_str("not json {").is_err());
    }

    #[test]
    fn test_periods_clamped_to_known_slots() {
        let json = r#"{
            "timeslots": [{"idx": 1, "start": "08:00", "end": "08:45"}],
            "courses": [{
                "name": "Lab",
                "day": 3,
                "periods": [1, 2, 9],
                "weeks": "01-16",
                "week_type": "all"
            }]
        }"#;
        let doc = parse_document_json_str(json).unwrap();
        assert_eq!(doc.courses[0].periods, vec![1]);
    }

    #[test]
    fn test_max_period_idx() {
        let doc = parse_document_json_str(sample_json()).unwrap();
        assert_eq!(doc.max_period_idx(), Some(2));
        assert_eq!(ScheduleDocument::default().max_period_idx(), None);
    }

    #[test]
    fn test_wire_round_trip() {
        let doc = parse_document_json_str(sample_json()).unwrap();
        let encoded = serde_json::to_string(&doc).unwrap();
        let decoded = parse_document_json_str(&encoded).unwrap();
        assert_eq!(doc, decoded);
    }
}

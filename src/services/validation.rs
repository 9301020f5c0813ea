//! Cross-field validation applied before a schedule document is persisted.
//!
//! The edit, register and import flows call [`validate_document`] and then
//! [`normalize_document`] before handing the document to storage. The
//! occurrence resolver assumes these rules hold; it never re-validates.
//! Unknown timezone names and malformed dates cannot occur here - they are
//! rejected earlier, at the JSON boundary (see
//! [`crate::models::parse_document_json_str`]).

use crate::models::{validate_weeks, ScheduleDocument};

/// A field-specific reason a document was refused.
///
/// Messages are surfaced to the end user as-is, so they name the offending
/// field and value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("start date is required (YYYY-MM-DD)")]
    MissingStartDate,
    #[error("at least one weekday must be enabled")]
    NoEnabledDays,
    #[error("enabled day {0} is out of range 1-7")]
    EnabledDayOutOfRange(u8),
    #[error("at least one timeslot is required")]
    NoTimeslots,
    #[error("timeslot idx {0} is out of range 1-99")]
    SlotIndexOutOfRange(u8),
    #[error("duplicate timeslot idx {0}")]
    DuplicateSlotIndex(u8),
    #[error("timeslot {idx} time \"{value}\" is not HH:MM")]
    SlotTimeNotHhmm { idx: u8, value: String },
    #[error("timeslot {0} must start before it ends")]
    SlotStartNotBeforeEnd(u8),
    #[error("course \"{0}\" needs a name")]
    CourseNameEmpty(usize),
    #[error("course \"{name}\": day {day} is out of range 1-7")]
    CourseDayOutOfRange { name: String, day: u8 },
    #[error("course \"{0}\" needs at least one period")]
    CoursePeriodsEmpty(String),
    #[error("course \"{name}\": weeks \"{weeks}\" is not valid (e.g. 01-16 or 01,03,04-09)")]
    CourseWeeksInvalid { name: String, weeks: String },
}

/// Check every pre-save rule, reporting the first violation.
pub fn validate_document(doc: &ScheduleDocument) -> Result<(), ValidationError> {
    if doc.start_date.is_none() {
        return Err(ValidationError::MissingStartDate);
    }

    if doc.enabled_days.is_empty() {
        return Err(ValidationError::NoEnabledDays);
    }
    for &day in &doc.enabled_days {
        if !(1..=7).contains(&day) {
            return Err(ValidationError::EnabledDayOutOfRange(day));
        }
    }

    if doc.timeslots.is_empty() {
        return Err(ValidationError::NoTimeslots);
    }
    let mut seen_idx = Vec::with_capacity(doc.timeslots.len());
    for slot in &doc.timeslots {
        if !(1..=99).contains(&slot.idx) {
            return Err(ValidationError::SlotIndexOutOfRange(slot.idx));
        }
        if seen_idx.contains(&slot.idx) {
            return Err(ValidationError::DuplicateSlotIndex(slot.idx));
        }
        seen_idx.push(slot.idx);

        let start = slot.start_time().ok_or_else(|| ValidationError::SlotTimeNotHhmm {
            idx: slot.idx,
            value: slot.start.clone(),
        })?;
        let end = slot.end_time().ok_or_else(|| ValidationError::SlotTimeNotHhmm {
            idx: slot.idx,
            value: slot.end.clone(),
        })?;
        if start >= end {
            return Err(ValidationError::SlotStartNotBeforeEnd(slot.idx));
        }
    }

    for (i, course) in doc.courses.iter().enumerate() {
        if course.name.trim().is_empty() {
            return Err(ValidationError::CourseNameEmpty(i + 1));
        }
        if !(1..=7).contains(&course.day) {
            return Err(ValidationError::CourseDayOutOfRange {
                name: course.name.clone(),
                day: course.day,
            });
        }
        if course.periods.is_empty() {
            return Err(ValidationError::CoursePeriodsEmpty(course.name.clone()));
        }
        if !validate_weeks(&course.weeks) {
            return Err(ValidationError::CourseWeeksInvalid {
                name: course.name.clone(),
                weeks: course.weeks.clone(),
            });
        }
    }

    Ok(())
}

/// Canonicalize a document in place before it is stored.
///
/// Deduplicates and sorts `enabled_days`, orders timeslots by `idx`,
/// strips stray spaces from weeks strings, and intersects every course's
/// periods with the slot indices that actually exist.
pub fn normalize_document(doc: &mut ScheduleDocument) {
    doc.enabled_days.sort_unstable();
    doc.enabled_days.dedup();

    doc.timeslots.sort_by_key(|slot| slot.idx);

    let slot_indices: Vec<u8> = doc.timeslots.iter().map(|slot| slot.idx).collect();
    for course in &mut doc.courses {
        course.weeks.retain(|c| c != ' ');
        course.periods.sort_unstable();
        course.periods.dedup();
        course.periods.retain(|p| slot_indices.contains(p));
    }
}

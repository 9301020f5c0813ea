//! The occurrence engine.
//!
//! Given a stored schedule document and an instant, this module computes
//! which calendar week the instant falls in, which grid cells have a class
//! running right now, which slot starts within the 15-minute lookahead
//! window, and the full per-cell course listing. It is a pure function of
//! `(document, query)` - no I/O, no internal state - so every renderer (the
//! authenticated viewer, the public share page, the printable full view)
//! calls it on each display refresh instead of keeping incremental state.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::api::{Cell, OccurrenceSnapshot};
use crate::models::{CoursePlacement, ScheduleDocument};

/// Lookahead window for the "class about to start" highlight, in minutes.
pub const NEXT_WINDOW_MINUTES: i64 = 15;

/// 1-based week number of `now` relative to `start_date`, computed in `tz`.
///
/// The difference is taken between calendar dates, never elapsed seconds,
/// so a DST transition inside the interval cannot shift the day count.
/// Returns 0 while the schedule has not started; there is no end date and
/// no mid-term week 0.
pub fn week_number(now: DateTime<Utc>, start_date: NaiveDate, tz: Tz) -> u32 {
    let local_date = now.with_timezone(&tz).date_naive();
    let diff_days = (local_date - start_date).num_days();
    if diff_days < 0 {
        0
    } else {
        (diff_days / 7 + 1) as u32
    }
}

/// One occurrence query: the instant to resolve, an optional display
/// timezone override, and the show-all-weeks flag.
#[derive(Debug, Clone, Copy)]
pub struct OccurrenceQuery {
    /// The instant to resolve (server clock, or a caller-supplied preview
    /// instant).
    pub now: DateTime<Utc>,
    /// Timezone countdown times are rendered in. Defaults to the document's
    /// recurrence timezone; never affects week or weekday computation.
    pub display_tz: Option<Tz>,
    /// Ignore week membership and parity entirely ("preview full schedule").
    pub show_all: bool,
}

impl OccurrenceQuery {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            display_tz: None,
            show_all: false,
        }
    }

    pub fn show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn display_tz(mut self, tz: Option<Tz>) -> Self {
        self.display_tz = tz;
        self
    }
}

/// Resolve one occurrence query against a document.
///
/// Degrades gracefully instead of raising: while the schedule has not
/// started (`week_no == 0`, including documents with no start date at all)
/// the highlight sets stay empty and only the grid is returned. A document
/// without a start date renders its grid unfiltered, since it may
/// legitimately be mid-setup.
pub fn resolve_occurrence(doc: &ScheduleDocument, query: &OccurrenceQuery) -> OccurrenceSnapshot {
    let tz = doc.tz;
    let display_tz = query.display_tz.unwrap_or(tz);

    let week_no = match doc.start_date {
        Some(start) => week_number(query.now, start, tz),
        None => 0,
    };

    // Week filtering only applies when the document has a start date and the
    // viewer did not ask for every week.
    let filter_weeks = !query.show_all && doc.start_date.is_some();
    let is_active = |c: &CoursePlacement| !filter_weeks || c.active_in_week(week_no);

    let grid = build_grid(doc, &is_active);

    // Not configured, or not started yet: grid only, no highlight metadata.
    if week_no == 0 {
        return OccurrenceSnapshot::not_started(grid);
    }

    let now_calc = query.now.with_timezone(&tz);
    let weekday = now_calc.weekday().number_from_monday() as u8;
    // Slot boundaries are minute-precise (`HH:MM`), so the query instant is
    // truncated to the minute before comparing.
    let now_hhmm = NaiveTime::from_hms_opt(now_calc.hour(), now_calc.minute(), 0)
        .unwrap_or_else(|| now_calc.time());

    // Cells whose interval covers the instant; boundary matches count.
    let mut current_idx: Vec<u8> = Vec::new();
    for slot in &doc.timeslots {
        if let (Some(start), Some(end)) = (slot.start_time(), slot.end_time()) {
            if start <= now_hhmm && now_hhmm <= end {
                current_idx.push(slot.idx);
            }
        }
    }
    let current_cells: Vec<Cell> = current_idx.iter().map(|&p| Cell::new(weekday, p)).collect();

    let mut current_courses: Vec<CoursePlacement> = Vec::new();
    if !current_idx.is_empty() {
        for course in &doc.courses {
            if course.day == weekday
                && course.periods.iter().any(|p| current_idx.contains(p))
                && is_active(course)
            {
                current_courses.push(course.clone());
            }
        }
    }

    // Nearest future slot today; ties on the same start time share the
    // highlight. The scan never crosses into the next day.
    let mut earliest: Option<(i64, NaiveTime)> = None;
    let mut next_idx: Vec<u8> = Vec::new();
    for slot in &doc.timeslots {
        let Some(start) = slot.start_time() else {
            continue;
        };
        if start <= now_hhmm {
            continue;
        }
        let diff_min = (start - now_hhmm).num_minutes();
        match earliest {
            Some((best, _)) if diff_min > best => {}
            Some((best, _)) if diff_min == best => next_idx.push(slot.idx),
            _ => {
                earliest = Some((diff_min, start));
                next_idx = vec![slot.idx];
            }
        }
    }

    let mut next_cells: Vec<Cell> = Vec::new();
    let mut next_deadline_ms = None;
    let mut next_start_hhmm = None;
    let mut upcoming_courses: Vec<CoursePlacement> = Vec::new();

    if let Some((diff_min, next_start)) = earliest {
        if diff_min <= NEXT_WINDOW_MINUTES {
            next_cells = next_idx.iter().map(|&p| Cell::new(weekday, p)).collect();

            let local_start = now_calc.date_naive().and_time(next_start);
            if let Some(instant) = tz.from_local_datetime(&local_start).earliest() {
                next_deadline_ms = Some(instant.timestamp_millis());
                next_start_hhmm =
                    Some(instant.with_timezone(&display_tz).format("%H:%M").to_string());
            }

            if let Some(&lead) = next_idx.first() {
                for course in &doc.courses {
                    if course.day == weekday && course.occupies_period(lead) && is_active(course) {
                        upcoming_courses.push(course.clone());
                    }
                }
            }
        }
    }

    OccurrenceSnapshot {
        week_no,
        current_cells,
        current_courses,
        next_cells,
        next_deadline_ms,
        next_start_hhmm,
        upcoming_courses,
        grid,
    }
}

/// Build the full day -> period -> placements grid, independent of the query
/// instant. Placement order within a cell follows document order.
fn build_grid(
    doc: &ScheduleDocument,
    is_active: &impl Fn(&CoursePlacement) -> bool,
) -> BTreeMap<u8, BTreeMap<u8, Vec<CoursePlacement>>> {
    let mut enabled: Vec<u8> = doc.enabled_days.clone();
    enabled.sort_unstable();
    enabled.dedup();

    let mut grid: BTreeMap<u8, BTreeMap<u8, Vec<CoursePlacement>>> = BTreeMap::new();
    for &day in &enabled {
        let mut row: BTreeMap<u8, Vec<CoursePlacement>> = BTreeMap::new();
        for slot in &doc.timeslots {
            row.entry(slot.idx).or_default();
        }
        grid.insert(day, row);
    }

    for course in &doc.courses {
        if !enabled.contains(&course.day) || !is_active(course) {
            continue;
        }
        for &period in &course.periods {
            if let Some(cell) = grid.get_mut(&course.day).and_then(|row| row.get_mut(&period)) {
                cell.push(course.clone());
            }
        }
    }
    grid
}

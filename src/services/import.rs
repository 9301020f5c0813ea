//! Course import from pasted CSV/text tables.
//!
//! The register and edit wizards accept a header-driven table
//! (`name,teacher,room,day,periods,weeks,week_type,note`) pasted from a
//! spreadsheet or produced by the AI extraction step. Rows are normalized
//! through the same week/period syntaxes the editors use, so an imported
//! course is indistinguishable from a hand-entered one.

use anyhow::{bail, Result};

use crate::models::{normalize_weeks, parse_periods, CoursePlacement, WeekType};

/// Columns the import understands. `name`, `day`, `periods`, `weeks` and
/// `week_type` must all appear in the header row.
const REQUIRED_COLUMNS: [&str; 5] = ["name", "day", "periods", "weeks", "week_type"];

/// Parse pasted CSV text into course placements.
///
/// `max_idx` bounds period indices the same way the editors do: the
/// document's highest slot index, or unbounded when it has no slots yet.
/// Rows with an empty name are skipped; missing `weeks` falls back to the
/// default term span `01-16`; unknown `week_type` values fall back to `all`.
pub fn parse_course_csv(text: &str, max_idx: Option<u8>) -> Result<Vec<CoursePlacement>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = match lines.next() {
        Some(line) => line,
        None => bail!("Import text is empty"),
    };
    let header: Vec<String> = split_csv_line(header_line)
        .into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    for required in REQUIRED_COLUMNS {
        if !header.iter().any(|h| h.as_str() == required) {
            bail!("Import header is missing the \"{required}\" column");
        }
    }

    let col = |name: &str| header.iter().position(|h| h.as_str() == name);
    let get = |row: &[String], name: &str| -> String {
        col(name)
            .and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut courses = Vec::new();
    for line in lines {
        let row = split_csv_line(line);

        let name = get(&row, "name");
        if name.is_empty() {
            continue;
        }

        let day: u8 = get(&row, "day").parse().unwrap_or(1);
        let periods = {
            let parsed = parse_periods(&get(&row, "periods"), max_idx);
            if parsed.is_empty() {
                vec![1]
            } else {
                parsed
            }
        };
        let weeks = normalize_weeks(&get(&row, "weeks"));
        let week_type = match get(&row, "week_type").to_lowercase().as_str() {
            "odd" => WeekType::Odd,
            "even" => WeekType::Even,
            _ => WeekType::All,
        };

        courses.push(CoursePlacement {
            name,
            teacher: get(&row, "teacher"),
            room: get(&row, "room"),
            day,
            periods,
            weeks,
            week_type,
            note: get(&row, "note"),
        });
    }

    if courses.is_empty() {
        bail!("No course rows found (need header name,day,periods,weeks,week_type)");
    }
    Ok(courses)
}

/// Split one CSV line, honoring double-quoted fields (a doubled quote inside
/// a quoted field is an escaped quote).
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

//! The compact week-set wire syntax.
//!
//! Week memberships are stored as comma-separated two-digit tokens, each a
//! single week (`"05"`) or an inclusive range (`"01-16"`), e.g.
//! `"01-16,20,22-24"`. The encoding is shared with CSV import columns and
//! existing stored documents, so it must stay byte-stable.

use std::collections::BTreeSet;

/// Expand a weeks string into the set of week numbers it denotes.
///
/// Whitespace is stripped and full-width separators (`，`, `、`) are accepted.
/// Reversed ranges are auto-corrected; malformed segments are skipped so that
/// documents stored by older clients keep rendering. Use [`validate_weeks`]
/// to reject bad input before it is saved.
pub fn parse_weeks(s: &str) -> BTreeSet<u32> {
    let mut weeks = BTreeSet::new();
    let normalized: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '，' || c == '、' { ',' } else { c })
        .collect();

    for seg in normalized.split(',') {
        if seg.is_empty() {
            continue;
        }
        if let Some((a, b)) = seg.split_once('-') {
            if let (Some(lo), Some(hi)) = (parse_week_num(a), parse_week_num(b)) {
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                weeks.extend(lo..=hi);
            }
        } else if let Some(w) = parse_week_num(seg) {
            weeks.insert(w);
        }
    }
    weeks
}

/// Check a weeks string against the save-time grammar:
/// two digits, optionally `-` + two digits, comma-separated.
///
/// This is the pre-save gate; it does not expand ranges.
pub fn validate_weeks(s: &str) -> bool {
    let stripped: String = s.chars().filter(|c| *c != ' ').collect();
    if stripped.is_empty() {
        return false;
    }
    stripped.split(',').all(|seg| match seg.split_once('-') {
        Some((a, b)) => is_two_digits(a) && is_two_digits(b),
        None => is_two_digits(seg),
    })
}

/// Render a week set in canonical form: contiguous runs collapsed to
/// `DD-DD`, singles zero-padded, joined with commas.
///
/// Round-tripping through [`parse_weeks`] is set-equal, not byte-identical.
pub fn format_weeks(weeks: &BTreeSet<u32>) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut iter = weeks.iter().copied();
    let mut run: Option<(u32, u32)> = iter.next().map(|w| (w, w));

    for w in iter {
        match run {
            Some((lo, hi)) if w == hi + 1 => run = Some((lo, w)),
            Some((lo, hi)) => {
                out.push(render_run(lo, hi));
                run = Some((w, w));
            }
            None => run = Some((w, w)),
        }
    }
    if let Some((lo, hi)) = run {
        out.push(render_run(lo, hi));
    }
    out.join(",")
}

/// Normalize a free-form weeks string to the canonical zero-padded encoding,
/// preserving segment order.
///
/// Accepts the loose shapes seen in CSV/AI import (`"1-16"`, `"[1-16]"`,
/// `"1，3"`) and is the identity on already-canonical input. Empty input
/// falls back to the default term span `01-16`.
pub fn normalize_weeks(raw: &str) -> String {
    let mut s: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '，' || c == '、' { ',' } else { c })
        .collect();
    if let Some(stripped) = s.strip_prefix('[') {
        s = stripped.to_string();
    }
    if let Some(stripped) = s.strip_suffix(']') {
        s = stripped.to_string();
    }
    if s.is_empty() {
        return "01-16".to_string();
    }

    let segs: Vec<String> = s
        .split(',')
        .filter(|seg| !seg.is_empty())
        .map(|seg| match seg.split_once('-') {
            Some((a, b)) => match (a.parse::<u32>(), b.parse::<u32>()) {
                (Ok(a), Ok(b)) => format!("{:02}-{:02}", a, b),
                _ => seg.to_string(),
            },
            None => match seg.parse::<u32>() {
                Ok(w) => format!("{:02}", w),
                Err(_) => seg.to_string(),
            },
        })
        .collect();
    segs.join(",")
}

fn render_run(lo: u32, hi: u32) -> String {
    if lo == hi {
        format!("{:02}", lo)
    } else {
        format!("{:02}-{:02}", lo, hi)
    }
}

fn parse_week_num(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn is_two_digits(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(weeks: &[u32]) -> BTreeSet<u32> {
        weeks.iter().copied().collect()
    }

    #[test]
    fn test_parse_single_and_range() {
        assert_eq!(parse_weeks("01-03,05"), set(&[1, 2, 3, 5]));
    }

    #[test]
    fn test_parse_full_term() {
        assert_eq!(parse_weeks("01-16").len(), 16);
    }

    #[test]
    fn test_parse_reversed_range_is_corrected() {
        assert_eq!(parse_weeks("09-04"), set(&[4, 5, 6, 7, 8, 9]));
    }

    #[test]
    fn test_parse_duplicates_collapse() {
        assert_eq!(parse_weeks("03,03,01-03"), set(&[1, 2, 3]));
    }

    #[test]
    fn test_parse_fullwidth_separators() {
        assert_eq!(parse_weeks("01，03、05"), set(&[1, 3, 5]));
    }

    #[test]
    fn test_parse_skips_malformed_segments() {
        assert_eq!(parse_weeks("01,abc,03-xx,05"), set(&[1, 5]));
    }

    #[test]
    fn test_parse_whitespace_stripped() {
        assert_eq!(parse_weeks(" 01 - 03 , 05 "), set(&[1, 2, 3, 5]));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_weeks("").is_empty());
    }

    #[test]
    fn test_validate_accepts_canonical_forms() {
        assert!(validate_weeks("01-16"));
        assert!(validate_weeks("01,03,04-09"));
        assert!(validate_weeks("01 , 03")); // spaces allowed, stripped
    }

    #[test]
    fn test_validate_rejects_bad_forms() {
        assert!(!validate_weeks(""));
        assert!(!validate_weeks("1-16")); // not zero-padded
        assert!(!validate_weeks("01-"));
        assert!(!validate_weeks("01,,03"));
        assert!(!validate_weeks("01-03-05"));
        assert!(!validate_weeks("week1"));
    }

    #[test]
    fn test_format_collapses_runs() {
        assert_eq!(format_weeks(&set(&[1, 2, 3, 5])), "01-03,05");
        assert_eq!(format_weeks(&set(&[4])), "04");
        assert_eq!(format_weeks(&set(&[])), "");
    }

    #[test]
    fn test_format_separate_runs() {
        assert_eq!(format_weeks(&set(&[1, 2, 4, 5, 9])), "01-02,04-05,09");
    }

    #[test]
    fn test_round_trip_is_set_equal() {
        for s in ["01-16", "01,03,04-09", "02-01,16", "05"] {
            let parsed = parse_weeks(s);
            assert_eq!(parse_weeks(&format_weeks(&parsed)), parsed, "input {s}");
        }
    }

    #[test]
    fn test_normalize_pads_and_cleans() {
        assert_eq!(normalize_weeks("1-16"), "01-16");
        assert_eq!(normalize_weeks("[1-8]"), "01-08");
        assert_eq!(normalize_weeks("1，3，5"), "01,03,05");
        assert_eq!(normalize_weeks(""), "01-16");
        assert_eq!(normalize_weeks("01-16"), "01-16");
    }
}

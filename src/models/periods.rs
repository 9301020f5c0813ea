//! The period-index list syntax used by course editors and CSV import.
//!
//! Periods are entered as `"1-2"` or `"1,3"`; full-width commas, dashes and
//! middle dots from IME input are accepted. Parsed values are clamped to the
//! document's known slot indices so a course can never reference a period
//! that does not exist yet.

/// Parse a period list into a sorted, deduplicated set of slot indices.
///
/// `max_idx` is the highest slot index currently defined by the document
/// (`None` when no timeslots exist yet, in which case values are unbounded).
/// When bounded, values outside `[1, max_idx]` are dropped.
pub fn parse_periods(s: &str, max_idx: Option<u8>) -> Vec<u8> {
    let normalized: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '，' | '、' | '·' => ',',
            '－' | '—' | '–' | '‒' | '―' => '-',
            _ => c,
        })
        .collect();

    let mut out: Vec<u8> = Vec::new();
    for seg in normalized.split(',') {
        if seg.is_empty() {
            continue;
        }
        if let Some((a, b)) = seg.split_once('-') {
            if let (Ok(lo), Ok(hi)) = (a.parse::<u8>(), b.parse::<u8>()) {
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                out.extend(lo..=hi);
            }
        } else if let Ok(p) = seg.parse::<u8>() {
            out.push(p);
        }
    }

    out.sort_unstable();
    out.dedup();
    if let Some(max) = max_idx {
        out.retain(|p| (1..=max).contains(p));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::parse_periods;

    #[test]
    fn test_parse_singles() {
        assert_eq!(parse_periods("1,3", None), vec![1, 3]);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_periods("1-4", None), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_reversed_range() {
        assert_eq!(parse_periods("4-2", None), vec![2, 3, 4]);
    }

    #[test]
    fn test_parse_dedupes_and_sorts() {
        assert_eq!(parse_periods("3,1,2-3", None), vec![1, 2, 3]);
    }

    #[test]
    fn test_clamps_to_max_idx() {
        assert_eq!(parse_periods("1-5", Some(3)), vec![1, 2, 3]);
        assert_eq!(parse_periods("0,1", Some(3)), vec![1]);
    }

    #[test]
    fn test_unbounded_when_no_slots() {
        assert_eq!(parse_periods("1-5", None), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fullwidth_punctuation() {
        assert_eq!(parse_periods("1，3", None), vec![1, 3]);
        assert_eq!(parse_periods("1－2", Some(9)), vec![1, 2]);
    }

    #[test]
    fn test_malformed_segments_skipped() {
        assert_eq!(parse_periods("1,x,2-y", None), vec![1]);
        assert!(parse_periods("", Some(5)).is_empty());
    }
}

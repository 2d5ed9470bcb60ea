// src/core/sanitize.rs
use std::sync::LazyLock;

use regex::Regex;

static DASH_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-\s*").unwrap());

/// Collapse every whitespace run (NBSP included) to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Time ranges: en/em dashes become `-`, always written as `a - b`.
pub fn normalize_time(s: &str) -> String {
    let text = normalize_ws(s).replace(['\u{2013}', '\u{2014}'], "-");
    normalize_ws(&DASH_GAP.replace_all(&text, " - "))
}

/// Span attribute value → count. Missing, non-numeric or < 1 means 1.
pub fn parse_span(attr: Option<&str>) -> usize {
    attr.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_collapses_including_nbsp() {
        assert_eq!(normalize_ws("  j.\u{a0}polski \n\t 1 "), "j. polski 1");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn time_dashes_normalize() {
        assert_eq!(normalize_time("8:00\u{2013}8:45"), "8:00 - 8:45");
        assert_eq!(normalize_time(" 8:55 \u{2014}  9:40"), "8:55 - 9:40");
        assert_eq!(normalize_time("10:00-10:45"), "10:00 - 10:45");
    }

    #[test]
    fn spans_floor_at_one() {
        assert_eq!(parse_span(None), 1);
        assert_eq!(parse_span(Some("3")), 3);
        assert_eq!(parse_span(Some(" 2 ")), 2);
        assert_eq!(parse_span(Some("0")), 1);
        assert_eq!(parse_span(Some("-4")), 1);
        assert_eq!(parse_span(Some("wide")), 1);
    }
}

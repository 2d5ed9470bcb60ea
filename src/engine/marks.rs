// src/engine/marks.rs
//! Subgroup marks: short labels like `1/2` or `a3` that tell parallel
//! sections of a split class apart.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::sanitize::normalize_ws;

// `digits/digits` or one letter followed by digits
const MARK_PATTERN: &str = r"[0-9]+/[0-9]+|[a-ząćęłńóśżź][0-9]+";

static DASH_MARK_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\s*-\s*(?:{MARK_PATTERN})\s*$")).unwrap());
static PAREN_MARK_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\s*\((?:{MARK_PATTERN})\)\s*$")).unwrap());
static TRAILING_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]+)\)\s*$").unwrap());
static TRAILING_PARENS_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]+\)\s*$").unwrap());
static FRACTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)/(\d+)$").unwrap());

/// Mark in the trailing parentheses of a group block's text: `3A (1/2)` → `1/2`.
pub fn trailing_mark(text: &str) -> Option<String> {
    let text = normalize_ws(text);
    let caps = TRAILING_PARENS.captures(&text)?;
    let mark = normalize_ws(&caps[1]);
    if mark.is_empty() { None } else { Some(mark) }
}

/// `subject - mark`, unless the mark already appears as a word in it.
pub fn append_mark(subject: &str, mark: &str) -> String {
    let subject = normalize_ws(subject);
    let mark = normalize_ws(mark);
    if subject.is_empty() || mark.is_empty() || has_mark(&subject, &mark) {
        return subject;
    }
    join!(subject.as_str(), " - ", &mark)
}

/// `mark` occurs case-insensitively as a whole token: preceded by the
/// start, whitespace, `-` or `(`, followed by the end, whitespace or `)`.
fn has_mark(subject: &str, mark: &str) -> bool {
    let subject = subject.to_lowercase();
    let mark = mark.to_lowercase();
    subject.match_indices(&mark).any(|(at, _)| {
        let before = subject[..at].chars().next_back();
        let after = subject[at + mark.len()..].chars().next();
        before.is_none_or(|c| c.is_whitespace() || c == '-' || c == '(')
            && after.is_none_or(|c| c.is_whitespace() || c == ')')
    })
}

/// Lowercased subject with any trailing `- mark` / `(mark)` removed; the
/// form used to match the same lesson across views.
pub fn match_form(subject: &str) -> String {
    let s = normalize_ws(subject).to_lowercase();
    if s.is_empty() {
        return s;
    }
    let s = DASH_MARK_SUFFIX.replace(&s, "");
    let s = PAREN_MARK_SUFFIX.replace(&s, "");
    normalize_ws(&s)
}

/// Group display name carrying `mark`: `3A (1/2)` + `2/2` → `3A (2/2)`.
pub fn relabel_group(name: &str, mark: &str) -> String {
    let base = TRAILING_PARENS_GAP.replace(&normalize_ws(name), "").into_owned();
    format!("{base} ({})", normalize_ws(mark))
}

/// Sort key for marks: fractions first (by denominator, then numerator,
/// then text); everything else after, case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MarkOrder {
    Fraction { den: u64, num: u64, raw: String },
    Other { folded: String, raw: String },
}

impl MarkOrder {
    pub fn of(mark: &str) -> Self {
        let raw = normalize_ws(mark);
        if let Some(caps) = FRACTION.captures(&raw) {
            if let (Ok(num), Ok(den)) = (caps[1].parse(), caps[2].parse()) {
                return MarkOrder::Fraction { den, num, raw };
            }
        }
        MarkOrder::Other { folded: raw.to_lowercase(), raw }
    }
}

pub fn sort_marks(marks: &mut [String]) {
    marks.sort_by_cached_key(|m| MarkOrder::of(m));
}

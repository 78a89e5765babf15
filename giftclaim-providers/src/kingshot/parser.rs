//! Low-level helpers shared by the listing extraction strategies.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Prefix some data islands put in front of serialized dates.
const DATE_MARKER: &str = "$D";

/// Words from the page chrome that look like codes but never are.
pub(crate) const STRUCTURAL_WORDS: &[&str] = &[
    "ACTIVE", "EXPIRED", "EXPIRES", "COPY", "QUICK", "REDEEM", "SHARE", "GIFT", "CODE", "CODES",
    "TOTAL", "AT", "NOT", "SPECIFIED", "YET", "DOCTYPE", "HTML",
];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

static STANDALONE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{4,20}$").expect("Invalid regex"));

/// Parses an expiration value, tolerating the `$D` marker.
///
/// Offset-less values are read as UTC.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    let value = value.strip_prefix(DATE_MARKER).unwrap_or(value).trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    debug!(value, "Unparseable expiration");
    None
}

/// Replaces markup tags with line breaks.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "\n").into_owned()
}

/// Returns true for page chrome words such as "ACTIVE" or "COPY".
pub fn is_structural_word(token: &str) -> bool {
    STRUCTURAL_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(token))
}

/// Checks one line of stripped text for a standalone code.
///
/// Mixed-case words without digits are prose, not codes.
pub fn standalone_code(line: &str) -> Option<String> {
    let token = line.trim();
    if !STANDALONE_CODE_RE.is_match(token) || is_structural_word(token) {
        return None;
    }

    let has_lower = token.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    if has_lower && !has_digit {
        return None;
    }

    Some(token.to_ascii_uppercase())
}

/// Moves `index` back to the nearest char boundary of `s`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_expiry_marker() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_expiry("$D2025-03-01T12:00:00.000Z"), Some(expected));
        assert_eq!(parse_expiry("2025-03-01T12:00:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_expiry_offset_normalized_to_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_expiry("2025-03-01T12:00:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_expiry_naive_is_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_expiry("2025-03-01T12:00:00"), Some(expected));
        assert_eq!(
            parse_expiry("2025-03-01"),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_expiry_garbage() {
        assert_eq!(parse_expiry("soon"), None);
        assert_eq!(parse_expiry("$D"), None);
    }

    #[test]
    fn test_standalone_code() {
        assert_eq!(standalone_code("  WINTER2025 "), Some("WINTER2025".to_string()));
        assert_eq!(standalone_code("abc123"), Some("ABC123".to_string()));
        assert_eq!(standalone_code("Copy"), None);
        assert_eq!(standalone_code("EXPIRED"), None);
        assert_eq!(standalone_code("two words"), None);
        assert_eq!(standalone_code("ABC"), None);
    }

    #[test]
    fn test_floor_char_boundary() {
        let s = "aé";
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 10), s.len());
    }
}

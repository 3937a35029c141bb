//! # Calendar Answer Formats
//!
//! Date, time and date-time answers must have the exact fixed-width
//! shape of their pattern (four-digit year, two-digit fields, no sign,
//! no padding) and name a real calendar instant. No timezone suffix and
//! no fractional seconds are accepted.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Pattern for `date` answers, e.g. `2023-02-28`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pattern for `time` answers, e.g. `14:05:00`.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Pattern for `date-time` answers, e.g. `2023-02-28T14:05:00`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Fixed-width shape of each pattern; `d` is any ASCII digit.
const DATE_SHAPE: &str = "dddd-dd-dd";
const TIME_SHAPE: &str = "dd:dd:dd";
const DATE_TIME_SHAPE: &str = "dddd-dd-ddTdd:dd:dd";

/// Returns true if `s` has exactly the layout of `shape`.
///
/// chrono's numeric fields tolerate signs, short years and leading
/// spaces, so the layout is checked before parsing.
fn has_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, expected)| match expected {
            b'd' => c.is_ascii_digit(),
            literal => c == literal,
        })
}

/// Returns true if `s` is a calendar date under [`DATE_FORMAT`].
pub fn is_date(s: &str) -> bool {
    has_shape(s, DATE_SHAPE) && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
}

/// Returns true if `s` is a time of day under [`TIME_FORMAT`].
pub fn is_time(s: &str) -> bool {
    has_shape(s, TIME_SHAPE) && NaiveTime::parse_from_str(s, TIME_FORMAT).is_ok()
}

/// Returns true if `s` is a date-time under [`DATE_TIME_FORMAT`].
pub fn is_date_time(s: &str) -> bool {
    has_shape(s, DATE_TIME_SHAPE) && NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_accepts_real_date() {
        assert!(is_date("2023-02-28"));
        assert!(is_date("2024-02-29"));
    }

    #[test]
    fn test_date_rejects_impossible_date() {
        assert!(!is_date("2023-02-30"));
        assert!(!is_date("2023-02-29"));
        assert!(!is_date("2023-13-01"));
    }

    #[test]
    fn test_date_rejects_other_shapes() {
        assert!(!is_date("28.02.2023"));
        assert!(!is_date("2023-02-28T10:00:00"));
        assert!(!is_date(""));
    }

    #[test]
    fn test_date_requires_exact_width() {
        assert!(!is_date("23-02-28"));
        assert!(!is_date("023-02-28"));
        assert!(!is_date(" 2023-02-28"));
        assert!(!is_date("+2023-02-28"));
        assert!(!is_date("2023-2-28"));
        assert!(!is_date("2023-02-8"));
        assert!(!is_date("2023-02- 8"));
        assert!(!is_date("20230-02-28"));
    }

    #[test]
    fn test_time_requires_exact_width() {
        assert!(!is_time(" 08:30:00"));
        assert!(!is_time("8:30:00"));
        assert!(!is_time("08:3:00"));
        assert!(!is_time("+8:30:00"));
    }

    #[test]
    fn test_date_time_requires_exact_width() {
        assert!(!is_date_time("23-2-3T1:2:3"));
        assert!(!is_date_time("23-02-28T14:05:00"));
        assert!(!is_date_time(" 2023-02-28T14:05:00"));
        assert!(!is_date_time("2023-02-28T 4:05:00"));
        assert!(!is_date_time("2023-02-28t14:05:00"));
    }

    #[test]
    fn test_non_ascii_input_does_not_match() {
        assert!(!is_date("２０２３-02-28"));
        assert!(!is_time("08:30:0é"));
    }

    #[test]
    fn test_time() {
        assert!(is_time("14:05:00"));
        assert!(is_time("00:00:00"));
        assert!(!is_time("24:00:00"));
        assert!(!is_time("14:05"));
        assert!(!is_time("14:05:00Z"));
    }

    #[test]
    fn test_date_time() {
        assert!(is_date_time("2023-02-28T14:05:00"));
        assert!(!is_date_time("2023-02-28 14:05:00"));
        assert!(!is_date_time("2023-02-28T14:05:00Z"));
        assert!(!is_date_time("2023-02-30T14:05:00"));
        assert!(!is_date_time("2023-02-28"));
    }
}

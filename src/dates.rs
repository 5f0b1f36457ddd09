//! Permissive date parsing for observation rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Day-first layouts. `%y` must precede `%Y`: chrono reads `%Y` from as few
/// as one digit, so `30/01/20` would otherwise land in year 20.
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// Parses a date from any of the supported layouts.
///
/// Returns `None` for empty or unrecognised input; a bad date never fails
/// the row.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let formats = if starts_with_year(value) {
        YEAR_FIRST_FORMATS
    } else {
        DAY_FIRST_FORMATS
    };
    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

/// Four digits followed by a separator.
fn starts_with_year(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && !bytes[4].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_date("2021-01-02"), Some(ymd(2021, 1, 2)));
        assert_eq!(parse_date("  2021/01/02 "), Some(ymd(2021, 1, 2)));
    }

    #[test]
    fn test_day_first_slash_dates() {
        assert_eq!(parse_date("30/01/20"), Some(ymd(2020, 1, 30)));
        assert_eq!(parse_date("02/03/2021"), Some(ymd(2021, 3, 2)));
        assert_eq!(parse_date("15-08-2021"), Some(ymd(2021, 8, 15)));
    }

    #[test]
    fn test_month_first_fallback() {
        // 13 cannot be a month, so day-first fails and month-first applies
        assert_eq!(parse_date("12/13/2020"), Some(ymd(2020, 12, 13)));
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(parse_date("2021-05-01T08:30:00+05:30"), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_date("2021-05-01 08:30:00"), Some(ymd(2021, 5, 1)));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2021-02-30"), None);
    }
}

/// Utilities for date formatting
///
/// The backend speaks ISO dates (`YYYY-MM-DD`); the dashboard shows them as
/// `YYYY/MM/DD` and stamps exported file names with the ISO form.
use chrono::{Local, NaiveDate};

/// Today's local date as `YYYY-MM-DD`
pub fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Format ISO date string to YYYY/MM/DD
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "2024/03/15"
pub fn format_date(date_str: &str) -> String {
    match parse_date(date_str) {
        Some(d) => d.format("%Y/%m/%d").to_string(),
        None => date_str.to_string(),
    }
}

/// Date part of an ISO date/datetime, if it parses
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let date_part = date_str.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` stamp for file names; falls back to `fallback` when the
/// date does not parse.
pub fn file_stamp(date_str: &str, fallback: &str) -> String {
    parse_date(date_str)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "2024/03/15");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "2024/03/15");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_date("invalid"), "invalid");
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_file_stamp() {
        assert_eq!(file_stamp("2025-01-09T00:00:00Z", "x"), "2025-01-09");
        assert_eq!(file_stamp("", "2025-02-01"), "2025-02-01");
    }

    #[test]
    fn test_today_is_iso() {
        assert!(parse_date(&today_iso()).is_some());
    }
}

//! Display formatting helpers for tables and detail panes.

use chrono::{DateTime, Utc};

/// Format a timestamp as e.g. "Mar 10, 2026".
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Format an optional timestamp, "N/A" when missing.
pub fn format_optional_date(date: &Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => format_date(date),
        None => "N/A".to_string(),
    }
}

/// Format a currency amount as e.g. "$10.99".
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "Mar 10, 2026");
    }

    #[test]
    fn test_format_optional_date() {
        let date = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(format_optional_date(&Some(date)), "Jan 02, 2026");
        assert_eq!(format_optional_date(&None), "N/A");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(10.99), "$10.99");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234.5), "$1234.50");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}

//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Datelike, Local, NaiveDate};

/// Format a timestamp for use inside a file name
pub fn format_file_timestamp(timestamp: DateTime<Local>) -> String {
    timestamp.format("%Y-%m-%d_%H%M%S").to_string()
}

/// Build a timestamp-qualified CSV file name
pub fn report_file_name(prefix: &str, timestamp: DateTime<Local>) -> String {
    format!(
        "{}-{}.csv",
        sanitize_filename(prefix),
        format_file_timestamp(timestamp)
    )
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of days in a month, zero for an out-of-range month
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Mask raw date keystrokes (`ddmmyyyy`) into `dd/mm/yyyy`.
///
/// Non-digits are dropped and input past eight digits is ignored. Partial
/// input is rendered progressively (`0102` becomes `01/02/`). Once all eight
/// digits are present and the month is valid, the day is clamped to the
/// length of that month.
pub fn format_date_input(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).take(8).collect();

    let mut out = String::with_capacity(10);
    for (i, c) in digits.iter().enumerate() {
        out.push(*c);
        if i % 2 == 1 && i < 4 {
            out.push('/');
        }
    }

    if digits.len() < 8 {
        return out;
    }

    let field = |range: std::ops::Range<usize>| -> u32 {
        digits[range]
            .iter()
            .fold(0, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0))
    };
    let mut day = field(0..2);
    let month = field(2..4);
    let year = field(4..8) as i32;

    let max_day = days_in_month(month, year);
    if day == 0 || max_day == 0 {
        return out;
    }
    if day > max_day {
        day = max_day;
    }

    format!("{:02}/{:02}/{:04}", day, month, year)
}

/// Parse a `dd/mm/yyyy` display date
pub fn parse_display_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()
}

/// Render a date the way event forms display it
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year())
}

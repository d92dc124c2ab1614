use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+)\s+(\d{4})").expect("static regex")
});

// Stricter form used for the human-readable metadata line: capitalised month name.
static DISPLAY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}(?:st|nd|rd|th)?\s+[A-Z][a-z]+\s+\d{4}").expect("static regex")
});

const MONTHS: [&str; 12] = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];

pub fn month_number(name: &str) -> Option<u32> {
    let abbr: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == abbr).map(|i| i as u32 + 1)
}

/// Finds the first `<day>[st|nd|rd|th] <Month> <year>` in `s`.
/// Unknown months and impossible days yield `None`.
pub fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date(s: &str) -> Option<String> {
    parse_day_month_year(s).map(format_iso)
}

pub fn find_display_date(s: &str) -> Option<&str> {
    DISPLAY_DATE.find(s).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_dates() {
        assert_eq!(parse_iso_date("22nd Jan 2024").as_deref(), Some("2024-01-22"));
        assert_eq!(parse_iso_date("1st Nov 2024").as_deref(), Some("2024-11-01"));
        assert_eq!(parse_iso_date("3rd March 2023").as_deref(), Some("2023-03-03"));
        assert_eq!(parse_iso_date("posted 14 sep 2021, edited").as_deref(), Some("2021-09-14"));
    }

    #[test]
    fn unparseable_is_none() {
        assert_eq!(parse_iso_date("yesterday"), None);
        assert_eq!(parse_iso_date("22nd Foo 2024"), None);
        assert_eq!(parse_iso_date("31st Feb 2024"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn display_date_requires_capital_month() {
        assert_eq!(find_display_date("Posted 22nd Jan 2024 by x"), Some("22nd Jan 2024"));
        assert_eq!(find_display_date("22nd jan 2024"), None);
    }

    #[test]
    fn month_lookup_uses_three_letter_prefix() {
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("MAY"), Some(5));
        assert_eq!(month_number("Ma"), None);
    }
}

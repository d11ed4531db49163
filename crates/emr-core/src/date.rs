//! Calendar dates for EMR records
//!
//! Dates are parsed with a hand-rolled regex rather than
//! `NaiveDate::parse_from_str`/`strptime`, which pays a locale lookup on
//! every call. The record stream can carry millions of dates, so the
//! regex is compiled once and reused.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4})-(\d{2})-(\d{2})\s*$").unwrap());

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_YEAR: f64 = SECONDS_PER_DAY * 365.25;

/// A calendar date, `(year, month, day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date(NaiveDate);

impl Date {
    /// The earliest representable date, used as an open lower study-period
    /// bound when no `min_age` is given.
    pub const MIN: Date = Date(NaiveDate::MIN);
    /// The latest representable date, used as an open upper study-period
    /// bound when no `max_age` is given.
    pub const MAX: Date = Date(NaiveDate::MAX);

    /// Construct a `Date` from a `chrono` date.
    pub fn new(date: NaiveDate) -> Self {
        Date(date)
    }

    /// Parse the strict `YYYY-MM-DD` format used by the record codec.
    ///
    /// Returns `None` for anything that doesn't fit the pattern exactly,
    /// including the empty string (callers treat that as "absent").
    pub fn parse(text: &str) -> Option<Self> {
        let caps = DATE_PATTERN.captures(text)?;
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(Date)
    }

    /// Number of whole days between two dates (`hi - lo`, can be negative).
    pub fn days_between(lo: Date, hi: Date) -> i64 {
        (hi.0 - lo.0).num_days()
    }

    /// Add a whole number of days.
    pub fn plus_days(self, days: i64) -> Date {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Add an age expressed in years, using the flat 365-day year the
    /// original study-period definition uses (not the 365.25-day year
    /// used for age reporting in `td_to_years`).
    pub fn plus_age_years(self, years: f64) -> Date {
        self.plus_days((years * 365.0).round() as i64)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Convert a duration in seconds to a fractional day count.
pub fn td_to_days(seconds: f64) -> f64 {
    seconds / SECONDS_PER_DAY
}

/// Convert a duration in seconds to a fractional year count, using the
/// 365.25-day year.
pub fn td_to_years(seconds: f64) -> f64 {
    seconds / SECONDS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strict_iso_date() {
        let d = Date::parse("2013-01-12").unwrap();
        assert_eq!(d.to_string(), "2013-01-12");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Date::parse("").is_none());
        assert!(Date::parse("2013-1-12").is_none());
        assert!(Date::parse("not-a-date").is_none());
        assert!(Date::parse("2013-13-01").is_none());
    }

    #[test]
    fn days_between_matches_subtraction() {
        let lo = Date::parse("2000-01-01").unwrap();
        let hi = Date::parse("2000-07-01").unwrap();
        assert_eq!(Date::days_between(lo, hi), 182);
    }

    #[test]
    fn plus_age_years_uses_flat_365() {
        let dob = Date::parse("1944-09-03").unwrap();
        let at_50 = dob.plus_age_years(50.0);
        assert_eq!(Date::days_between(dob, at_50), 50 * 365);
    }
}

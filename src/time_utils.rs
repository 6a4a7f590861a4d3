// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates and timestamps.
//!
//! Every date-scoped query in the journal is keyed by the `YYYY-MM-DD` form
//! produced by [`iso_date`]. Weeks start on Monday.

use chrono::{DateTime, Datelike, Days, NaiveDate, SecondsFormat, Utc};

use crate::error::AppError;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Canonical `YYYY-MM-DD` form of a calendar date.
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, AppError> {
    // chrono accepts non-padded fields, so insist on the canonical length too
    if raw.len() != 10 {
        return Err(invalid_date(raw));
    }
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT).map_err(|_| invalid_date(raw))
}

fn invalid_date(raw: &str) -> AppError {
    AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", raw))
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The Sunday closing the week that contains `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Days::new(6)
}

/// The seven consecutive dates of the week containing `date`, Monday first.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..7).map(|offset| start + Days::new(offset)).collect()
}

/// Monday of the week before the one containing `date`.
pub fn previous_week_start(date: NaiveDate) -> NaiveDate {
    week_start(date) - Days::new(7)
}

/// Inclusive sequence of dates from `from` to `to`; empty when `from > to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|day| *day <= to).collect()
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday_on_or_before() {
        // 2025-06-02 is a Monday
        assert_eq!(week_start(date(2025, 6, 2)), date(2025, 6, 2));
        assert_eq!(week_start(date(2025, 6, 5)), date(2025, 6, 2));
        assert_eq!(week_start(date(2025, 6, 8)), date(2025, 6, 2));
        // Crosses a year boundary
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn test_week_days_are_seven_consecutive_dates() {
        let days = week_days(date(2025, 6, 4));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2025, 6, 2));
        assert_eq!(days[6], date(2025, 6, 8));
        assert_eq!(week_end(date(2025, 6, 4)), date(2025, 6, 8));
    }

    #[test]
    fn test_previous_week_start() {
        assert_eq!(previous_week_start(date(2025, 6, 4)), date(2025, 5, 26));
    }

    #[test]
    fn test_iso_date_round_trip() {
        let d = date(2025, 1, 5);
        assert_eq!(iso_date(d), "2025-01-05");
        assert_eq!(parse_iso_date("2025-01-05").unwrap(), d);
    }

    #[test]
    fn test_parse_iso_date_rejects_loose_forms() {
        assert!(parse_iso_date("2025-1-5").is_err());
        assert!(parse_iso_date("2025-02-30").is_err());
        assert!(parse_iso_date("05/01/2025").is_err());
        assert!(matches!(
            parse_iso_date("nope"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_days_between_inclusive() {
        let days = days_between(date(2025, 2, 27), date(2025, 3, 2));
        assert_eq!(
            days,
            vec![
                date(2025, 2, 27),
                date(2025, 2, 28),
                date(2025, 3, 1),
                date(2025, 3, 2)
            ]
        );
        assert!(days_between(date(2025, 3, 2), date(2025, 3, 1)).is_empty());
    }
}

// ABOUTME: Calendar utility helpers shared across the application
// ABOUTME: Countdown arithmetic and canonical day normalization
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! Calendar utilities shared by the progress engine and the dashboard.

use chrono::{DateTime, NaiveDate, Utc};

/// Whole days remaining until `event`, floored at zero once the day arrives.
pub fn days_until(event: NaiveDate, today: NaiveDate) -> i64 {
    (event - today).num_days().max(0)
}

/// Normalize an instant to its calendar day.
///
/// This is the single canonicalization point for the polymorphic timestamps
/// the storage layer hands out; computation code works in `NaiveDate` only.
pub fn day_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_days_until_counts_down() {
        let event = NaiveDate::from_ymd_opt(2026, 5, 24).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 5, 20).unwrap();
        assert_eq!(days_until(event, today), 4);
    }

    #[test]
    fn test_days_until_floors_at_zero() {
        let event = NaiveDate::from_ymd_opt(2026, 5, 24).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert_eq!(days_until(event, after), 0);
        assert_eq!(days_until(event, event), 0);
    }

    #[test]
    fn test_day_of_strips_time() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(day_of(instant), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }
}

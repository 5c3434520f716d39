//! Calendar date-range helpers for the day/week/month views.
//!
//! Weeks run Monday through Sunday: a Sunday belongs to the week it
//! *ends*, not the next one. All functions are total over valid dates,
//! and all view logic compares plain local calendar dates, with
//! time-of-day truncated uniformly rather than mixed into comparisons.

use chrono::{Datelike, Days, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical `YYYY-MM-DD` string for the current local date.
#[must_use]
pub fn today_date_string() -> String {
    today().format("%Y-%m-%d").to_string()
}

/// The current local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `(monday, sunday)` of the week containing `date`.
#[must_use]
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = i64::from(date.weekday().num_days_from_monday());
    let monday = date - Duration::days(back);
    (monday, monday + Duration::days(6))
}

/// `(first day, last day)` of the month containing `date`, accounting
/// for variable month length.
#[must_use]
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(date);
    (first, last)
}

/// Monday 00:00:00.000 of the week containing `instant`.
#[must_use]
pub fn start_of_week(instant: NaiveDateTime) -> NaiveDateTime {
    week_bounds(instant.date()).0.and_time(NaiveTime::MIN)
}

/// Sunday 23:59:59.999 of the week containing `instant`. Applied to a
/// Sunday, this is that same Sunday; the week does not roll forward.
#[must_use]
pub fn end_of_week(instant: NaiveDateTime) -> NaiveDateTime {
    week_bounds(instant.date()).1.and_time(end_of_day())
}

/// First calendar day 00:00:00.000 of the month containing `instant`.
#[must_use]
pub fn start_of_month(instant: NaiveDateTime) -> NaiveDateTime {
    month_bounds(instant.date()).0.and_time(NaiveTime::MIN)
}

/// Last calendar day 23:59:59.999 of the month containing `instant`.
#[must_use]
pub fn end_of_month(instant: NaiveDateTime) -> NaiveDateTime {
    month_bounds(instant.date()).1.and_time(end_of_day())
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d)
            .and_hms_opt(12, 0, 0)
            .expect("valid datetime")
    }

    #[test]
    fn week_of_a_wednesday_runs_monday_to_sunday() {
        // 2025-01-08 is a Wednesday.
        let (monday, sunday) = week_bounds(date(2025, 1, 8));
        assert_eq!(monday, date(2025, 1, 6));
        assert_eq!(sunday, date(2025, 1, 12));
    }

    #[test]
    fn sunday_ends_its_own_week() {
        let (monday, sunday) = week_bounds(date(2025, 1, 12));
        assert_eq!(monday, date(2025, 1, 6));
        assert_eq!(sunday, date(2025, 1, 12));
    }

    #[test]
    fn week_instants_carry_day_boundaries() {
        let start = start_of_week(noon(2025, 1, 8));
        let end = end_of_week(noon(2025, 1, 8));
        assert_eq!(start.date(), date(2025, 1, 6));
        assert_eq!(start.time(), NaiveTime::MIN);
        assert_eq!(end.date(), date(2025, 1, 12));
        assert_eq!(
            end.time(),
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time")
        );
    }

    #[test]
    fn month_bounds_handle_variable_length() {
        assert_eq!(
            month_bounds(date(2025, 2, 14)),
            (date(2025, 2, 1), date(2025, 2, 28))
        );
        // Leap year February.
        assert_eq!(
            month_bounds(date(2024, 2, 14)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        // December rolls into the next year for the "first of next month"
        // computation.
        assert_eq!(
            month_bounds(date(2025, 12, 15)),
            (date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn month_instants_carry_day_boundaries() {
        let start = start_of_month(noon(2025, 6, 20));
        let end = end_of_month(noon(2025, 6, 20));
        assert_eq!(start.date(), date(2025, 6, 1));
        assert_eq!(start.time(), NaiveTime::MIN);
        assert_eq!(end.date(), date(2025, 6, 30));
        assert_eq!(
            end.time(),
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time")
        );
    }

    #[test]
    fn today_string_is_iso_date_shaped() {
        let s = today_date_string();
        assert_eq!(s.len(), 10);
        assert_eq!(s.as_bytes()[4], b'-');
        assert_eq!(s.as_bytes()[7], b'-');
        assert_eq!(s, today().format("%Y-%m-%d").to_string());
    }
}

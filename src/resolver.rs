//! Business-hours resolution.
//!
//! Pure functions answering "is this location open right now" and "when does
//! it next open" from the rows in [`crate::schedule`]. No I/O, no clock
//! access: the evaluation instant is always an argument.
//!
//! Timestamps are assumed to already be in the location's local time zone.
//! The crate performs no zone conversion; callers normalize before calling.
//! Comparisons run at `HH:MM` resolution, matching the stored data, so
//! seconds on the evaluation instant are ignored.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::schedule::{DateOverride, WeeklyHours};

/// How many days ahead `next_opening_time` scans before giving up.
///
/// A location open less often than once a week reports no next opening and
/// should be treated as permanently-closed-or-unknown by the caller. The
/// bound also keeps an all-closed schedule from looping forever.
pub const SEARCH_HORIZON_DAYS: u64 = 7;

/// Whether the location is open at `at`.
///
/// An override for `at`'s date takes precedence over the weekly schedule;
/// otherwise the instant counts as open if it falls inside any shift for
/// that weekday, bounds inclusive. Days with no rows are closed, and a
/// malformed shift counts as closed rather than erroring.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use clinic_kit::resolver::is_open;
/// use clinic_kit::schedule::WeeklyHours;
///
/// // Mondays 09:00-17:00
/// let weekly = vec![WeeklyHours::new(1, "09:00", "17:00")];
/// let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
///
/// assert!(is_open(&weekly, &[], monday.and_hms_opt(10, 0, 0).unwrap()));
/// assert!(!is_open(&weekly, &[], monday.and_hms_opt(18, 0, 0).unwrap()));
/// ```
pub fn is_open(weekly: &[WeeklyHours], overrides: &[DateOverride], at: NaiveDateTime) -> bool {
    let date = at.date();
    let time = minute_of(at);

    if let Some(ov) = override_for(overrides, date) {
        return match ov.bounds() {
            Some((open, close)) => time >= open && time <= close,
            None => false,
        };
    }

    let dow = weekday_index(date);
    weekly
        .iter()
        .filter(|row| row.day_of_week == dow)
        .filter_map(|row| row.bounds())
        .any(|(open, close)| time >= open && time <= close)
}

/// The next instant the location opens at or after `at`, if any within the
/// search horizon.
///
/// Scans day by day: first the remainder of `at`'s own date (openings
/// strictly later than `at`'s time), then the following
/// [`SEARCH_HORIZON_DAYS`] dates, returning the first day's earliest
/// opening. An override fully shadows the weekly schedule for its date, so
/// a closed override skips that day entirely.
///
/// Returns `None` when no opening exists within the horizon.
pub fn next_opening_time(
    weekly: &[WeeklyHours],
    overrides: &[DateOverride],
    at: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let time = minute_of(at);

    if let Some(open) = first_opening(weekly, overrides, at.date(), Some(time)) {
        return Some(at.date().and_time(open));
    }

    let mut date = at.date();
    for _ in 0..SEARCH_HORIZON_DAYS {
        date = date.checked_add_days(Days::new(1))?;
        if let Some(open) = first_opening(weekly, overrides, date, None) {
            return Some(date.and_time(open));
        }
    }

    None
}

/// Earliest opening on `date`, optionally restricted to openings strictly
/// after `after` (used for the partial "today" scan).
fn first_opening(
    weekly: &[WeeklyHours],
    overrides: &[DateOverride],
    date: NaiveDate,
    after: Option<NaiveTime>,
) -> Option<NaiveTime> {
    let qualifies = |open: NaiveTime| after.map_or(true, |t| open > t);

    if let Some(ov) = override_for(overrides, date) {
        // The override owns this date, closed or not; recurring shifts for
        // the same weekday are not consulted.
        return ov.bounds().map(|(open, _)| open).filter(|&o| qualifies(o));
    }

    let dow = weekday_index(date);
    weekly
        .iter()
        .filter(|row| row.day_of_week == dow)
        .filter_map(|row| row.bounds())
        .map(|(open, _)| open)
        .filter(|&o| qualifies(o))
        .min()
}

fn override_for(overrides: &[DateOverride], date: NaiveDate) -> Option<&DateOverride> {
    // At most one override exists per (location, date).
    overrides.iter().find(|ov| ov.date == date)
}

fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Truncate an instant to `HH:MM` resolution.
fn minute_of(at: NaiveDateTime) -> NaiveTime {
    at.time()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| at.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DateOverride, WeeklyHours};

    // 2025-06-02 is a Monday (day_of_week 1).
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn weekday_hours() -> Vec<WeeklyHours> {
        vec![WeeklyHours::new(1, "09:00", "17:00")]
    }

    #[test]
    fn test_no_rows_means_closed() {
        assert!(!is_open(&[], &[], at(monday(), 12, 0)));
        assert!(!is_open(&[], &[], at(monday(), 0, 0)));
        assert!(!is_open(&[], &[], at(monday(), 23, 59)));
    }

    #[test]
    fn test_open_within_shift() {
        let weekly = weekday_hours();
        assert!(is_open(&weekly, &[], at(monday(), 10, 0)));
    }

    #[test]
    fn test_closed_outside_shift() {
        let weekly = weekday_hours();
        assert!(!is_open(&weekly, &[], at(monday(), 18, 0)));
        // Tuesday has no rows
        let tuesday = monday().succ_opt().unwrap();
        assert!(!is_open(&weekly, &[], at(tuesday, 10, 0)));
    }

    #[test]
    fn test_inclusive_boundaries() {
        let weekly = weekday_hours();
        assert!(is_open(&weekly, &[], at(monday(), 9, 0)));
        assert!(is_open(&weekly, &[], at(monday(), 17, 0)));
        assert!(!is_open(&weekly, &[], at(monday(), 8, 59)));
        assert!(!is_open(&weekly, &[], at(monday(), 17, 1)));
    }

    #[test]
    fn test_seconds_are_ignored() {
        let weekly = weekday_hours();
        let closing_second = monday().and_hms_opt(17, 0, 45).unwrap();
        assert!(is_open(&weekly, &[], closing_second));
    }

    #[test]
    fn test_split_shifts() {
        let weekly = vec![
            WeeklyHours::new(1, "09:00", "12:00"),
            WeeklyHours::new(1, "14:00", "18:00"),
        ];
        assert!(is_open(&weekly, &[], at(monday(), 10, 0)));
        assert!(!is_open(&weekly, &[], at(monday(), 13, 0)));
        assert!(is_open(&weekly, &[], at(monday(), 15, 0)));
    }

    #[test]
    fn test_closed_override_beats_weekly() {
        let weekly = weekday_hours();
        let overrides = vec![DateOverride::closed(monday())];
        assert!(!is_open(&weekly, &overrides, at(monday(), 10, 0)));
    }

    #[test]
    fn test_open_override_replaces_weekly() {
        let weekly = weekday_hours();
        // Special hours 12:00-14:00 instead of the usual 09:00-17:00
        let overrides = vec![DateOverride::open(monday(), "12:00", "14:00")];
        assert!(!is_open(&weekly, &overrides, at(monday(), 10, 0)));
        assert!(is_open(&weekly, &overrides, at(monday(), 13, 0)));
    }

    #[test]
    fn test_override_with_null_times_is_closed() {
        let weekly = weekday_hours();
        let overrides = vec![DateOverride {
            date: monday(),
            is_closed: false,
            open_time: None,
            close_time: None,
        }];
        assert!(!is_open(&weekly, &overrides, at(monday(), 10, 0)));
    }

    #[test]
    fn test_malformed_shift_is_closed() {
        let weekly = vec![WeeklyHours {
            day_of_week: 1,
            open_time: Some("not-a-time".to_string()),
            close_time: Some("17:00".to_string()),
        }];
        assert!(!is_open(&weekly, &[], at(monday(), 10, 0)));
    }

    #[test]
    fn test_next_opening_later_today() {
        let weekly = vec![
            WeeklyHours::new(1, "09:00", "12:00"),
            WeeklyHours::new(1, "14:00", "18:00"),
        ];
        let next = next_opening_time(&weekly, &[], at(monday(), 12, 30));
        assert_eq!(next, Some(at(monday(), 14, 0)));
    }

    #[test]
    fn test_next_opening_skips_closed_days() {
        // Open Mondays only; asking after close on Monday lands next Monday.
        let weekly = weekday_hours();
        let next = next_opening_time(&weekly, &[], at(monday(), 18, 0));
        let next_monday = monday() + Days::new(7);
        assert_eq!(next, Some(at(next_monday, 9, 0)));
    }

    #[test]
    fn test_next_opening_prefers_override() {
        // Weekly says Monday 09:00, but Tuesday has special hours from 08:00.
        let weekly = weekday_hours();
        let tuesday = monday().succ_opt().unwrap();
        let overrides = vec![DateOverride::open(tuesday, "08:00", "12:00")];
        let next = next_opening_time(&weekly, &overrides, at(monday(), 18, 0));
        assert_eq!(next, Some(at(tuesday, 8, 0)));
    }

    #[test]
    fn test_next_opening_closed_override_shadows_day() {
        // Next Monday is a holiday; the opening after that is the Monday after.
        let weekly = weekday_hours();
        let next_monday = monday() + Days::new(7);
        let overrides = vec![DateOverride::closed(next_monday)];
        let next = next_opening_time(&weekly, &overrides, at(monday(), 18, 0));
        assert_eq!(next, None, "second Monday is beyond the 7-day horizon");

        // From Sunday evening the horizon covers both Mondays.
        let sunday = monday().pred_opt().unwrap();
        let next = next_opening_time(&weekly, &overrides, at(sunday, 20, 0));
        assert_eq!(next, Some(at(monday(), 9, 0)));
    }

    #[test]
    fn test_next_opening_empty_schedule_is_none() {
        assert_eq!(next_opening_time(&[], &[], at(monday(), 10, 0)), None);
    }

    #[test]
    fn test_next_opening_strictly_later_than_at() {
        // At exactly opening time the current shift no longer qualifies.
        let weekly = weekday_hours();
        let next = next_opening_time(&weekly, &[], at(monday(), 9, 0));
        let next_monday = monday() + Days::new(7);
        assert_eq!(next, Some(at(next_monday, 9, 0)));
    }

    #[test]
    fn test_next_opening_today_earliest_shift_wins() {
        let weekly = vec![
            WeeklyHours::new(1, "14:00", "18:00"),
            WeeklyHours::new(1, "09:00", "12:00"),
        ];
        // Row order must not matter.
        let next = next_opening_time(&weekly, &[], at(monday(), 6, 0));
        assert_eq!(next, Some(at(monday(), 9, 0)));
    }

    #[test]
    fn test_end_to_end_monday_scenario() {
        let weekly = weekday_hours();
        assert!(is_open(&weekly, &[], at(monday(), 10, 0)));
        assert!(!is_open(&weekly, &[], at(monday(), 18, 0)));
        let next_monday = monday() + Days::new(7);
        assert_eq!(
            next_opening_time(&weekly, &[], at(monday(), 18, 0)),
            Some(at(next_monday, 9, 0))
        );
    }
}

//! Opening-hours data model.
//!
//! Mirrors the relational rows the directory stores per location: recurring
//! weekly shifts and date-specific overrides. Times arrive as `HH:MM`
//! strings exactly as persisted; validation is deliberately lenient here
//! because the read path must never fail on a bad row. A shift that cannot
//! be resolved to a valid interval simply counts as closed.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One recurring shift on one weekday.
///
/// Multiple rows may share a `day_of_week` (split shifts, e.g. a lunch
/// closure). `open_time` and `close_time` are nullable together to signal a
/// closed day stored explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    /// 0–6, 0 = Sunday.
    pub day_of_week: u8,
    /// Local opening time, `HH:MM`.
    pub open_time: Option<String>,
    /// Local closing time, `HH:MM`. Must not precede `open_time`; no
    /// overnight wraparound.
    pub close_time: Option<String>,
}

impl WeeklyHours {
    pub fn new(day_of_week: u8, open_time: &str, close_time: &str) -> Self {
        WeeklyHours {
            day_of_week,
            open_time: Some(open_time.to_string()),
            close_time: Some(close_time.to_string()),
        }
    }

    /// A row recording the day as closed.
    pub fn closed(day_of_week: u8) -> Self {
        WeeklyHours {
            day_of_week,
            open_time: None,
            close_time: None,
        }
    }

    /// Validated interval for this shift, or `None` if the shift is closed
    /// or malformed.
    pub fn bounds(&self) -> Option<(NaiveTime, NaiveTime)> {
        shift_bounds(self.open_time.as_deref(), self.close_time.as_deref())
    }
}

/// A single calendar date's exception to the weekly schedule.
///
/// Created by an administrator ahead of a holiday or special event. Stale
/// past overrides are harmless: evaluation is keyed by exact date match and
/// nothing auto-expires them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOverride {
    pub date: NaiveDate,
    /// When true the location is closed regardless of weekly hours, and the
    /// time fields are ignored.
    pub is_closed: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

impl DateOverride {
    pub fn open(date: NaiveDate, open_time: &str, close_time: &str) -> Self {
        DateOverride {
            date,
            is_closed: false,
            open_time: Some(open_time.to_string()),
            close_time: Some(close_time.to_string()),
        }
    }

    pub fn closed(date: NaiveDate) -> Self {
        DateOverride {
            date,
            is_closed: true,
            open_time: None,
            close_time: None,
        }
    }

    /// Validated interval for this override, or `None` when it is closed or
    /// its times are missing or malformed.
    pub fn bounds(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_closed {
            return None;
        }
        shift_bounds(self.open_time.as_deref(), self.close_time.as_deref())
    }
}

/// Resolve an (open, close) pair of `HH:MM` strings to a validated interval.
///
/// Returns `None` when either side is null or unparseable, or when the pair
/// is inverted (open after close). Malformed rows are expected to be caught
/// at the admin form; here they degrade to closed so the read path stays
/// resilient.
pub fn shift_bounds(open: Option<&str>, close: Option<&str>) -> Option<(NaiveTime, NaiveTime)> {
    let open = parse_hhmm(open?)?;
    let close = parse_hhmm(close?)?;
    if open > close {
        debug!("Inverted shift {} > {} treated as closed", open, close);
        return None;
    }
    Some((open, close))
}

/// Parse a local `HH:MM` time-of-day string.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    match NaiveTime::parse_from_str(s, "%H:%M") {
        Ok(t) => Some(t),
        Err(_) => {
            debug!("Unparseable time-of-day {:?} treated as closed", s);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_hhmm("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("9am"), None);
        assert_eq!(parse_hhmm(""), None);
    }

    #[test]
    fn test_shift_bounds_valid() {
        let bounds = shift_bounds(Some("09:00"), Some("17:00"));
        assert_eq!(
            bounds,
            Some((
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(17, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_shift_bounds_half_null_is_closed() {
        assert_eq!(shift_bounds(Some("09:00"), None), None);
        assert_eq!(shift_bounds(None, Some("17:00")), None);
        assert_eq!(shift_bounds(None, None), None);
    }

    #[test]
    fn test_shift_bounds_inverted_is_closed() {
        assert_eq!(shift_bounds(Some("17:00"), Some("09:00")), None);
    }

    #[test]
    fn test_shift_bounds_zero_length_is_valid() {
        // open == close is a one-minute window, not malformed
        assert!(shift_bounds(Some("09:00"), Some("09:00")).is_some());
    }

    #[test]
    fn test_weekly_hours_closed_row() {
        let row = WeeklyHours::closed(0);
        assert_eq!(row.bounds(), None);
    }

    #[test]
    fn test_override_closed_ignores_times() {
        let mut ov = DateOverride::closed(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
        ov.open_time = Some("09:00".to_string());
        ov.close_time = Some("17:00".to_string());
        assert_eq!(ov.bounds(), None);
    }

    #[test]
    fn test_override_open_bounds() {
        let ov = DateOverride::open(
            NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
            "10:00",
            "14:00",
        );
        assert_eq!(
            ov.bounds(),
            Some((
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(14, 0, 0).unwrap()
            ))
        );
    }
}

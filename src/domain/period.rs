use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Planning window identified by its first calendar day.
///
/// The window length is not part of the value: it is a property of the graph
/// the period lives in (see [`GraphConfig`](crate::config::GraphConfig)), so
/// every method that needs the end of the window takes it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Period(NaiveDate);

impl Period {
    pub const fn from_start_date(start_date: NaiveDate) -> Self {
        Self(start_date)
    }

    pub const fn start_date(&self) -> NaiveDate {
        self.0
    }

    /// First day after the window (exclusive end).
    pub fn end_date(&self, length_days: u32) -> NaiveDate {
        self.0
            .checked_add_days(Days::new(u64::from(length_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns true if `date` falls inside `[start, start + length_days)`.
    pub fn contains(&self, date: NaiveDate, length_days: u32) -> bool {
        self.0 <= date && date < self.end_date(length_days)
    }

    /// Iterates the calendar days of the window in order.
    pub fn days(&self, length_days: u32) -> impl Iterator<Item = NaiveDate> {
        let start = self.0;
        (0..u64::from(length_days)).filter_map(move |offset| start.checked_add_days(Days::new(offset)))
    }

    /// Half-open timestamp window `[start 00:00, end 00:00)`.
    pub fn window(&self, length_days: u32) -> (NaiveDateTime, NaiveDateTime) {
        (
            self.0.and_time(NaiveTime::MIN),
            self.end_date(length_days).and_time(NaiveTime::MIN),
        )
    }
}

impl From<NaiveDate> for Period {
    fn from(start_date: NaiveDate) -> Self {
        Self(start_date)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_cover_the_whole_window() {
        let period = Period::from_start_date(date(2025, 1, 13));
        let days: Vec<_> = period.days(14).collect();

        assert_eq!(days.len(), 14);
        assert_eq!(days[0], date(2025, 1, 13));
        assert_eq!(days[13], date(2025, 1, 26));
    }

    #[test]
    fn contains_is_half_open() {
        let period = Period::from_start_date(date(2025, 1, 13));

        assert!(period.contains(date(2025, 1, 13), 14));
        assert!(period.contains(date(2025, 1, 26), 14));
        assert!(!period.contains(date(2025, 1, 27), 14));
        assert!(!period.contains(date(2025, 1, 12), 14));
    }

    #[test]
    fn periods_order_by_start_date() {
        let early = Period::from_start_date(date(2025, 1, 13));
        let late = Period::from_start_date(date(2025, 1, 27));
        assert!(early < late);
        assert_eq!(early.end_date(14), late.start_date());
    }

    #[test]
    fn display_uses_start_date() {
        let period = Period::from_start_date(date(2025, 1, 13));
        assert_eq!(period.to_string(), "P2025-01-13");
    }
}

//! Navigable anchors for the calendar views.
//!
//! Month and day anchors move independently, one calendar unit per step.
//! The week view has no anchor of its own; it always follows today's date.

use crate::calendar::{offset_day, YearMonth};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which calendar projection is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewKind {
    #[default]
    Month,
    Week,
    Day,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            other => Err(format!("unknown view `{other}`; expected month|week|day")),
        }
    }
}

/// Current view selection plus the month and day anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    view: ViewKind,
    month: YearMonth,
    day: NaiveDate,
}

impl CalendarCursor {
    /// Month view, both anchors on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: ViewKind::Month,
            month: YearMonth::containing(today),
            day: today,
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn set_view(&mut self, view: ViewKind) {
        self.view = view;
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.month = month;
    }

    pub fn set_day(&mut self, day: NaiveDate) {
        self.day = day;
    }

    /// Moves the month anchor by `delta` months.
    ///
    /// Returns `false` and stays put when the result is outside the
    /// supported calendar range.
    pub fn shift_month(&mut self, delta: i32) -> bool {
        match self.month.offset(delta) {
            Some(month) => {
                self.month = month;
                true
            }
            None => false,
        }
    }

    /// Moves the day anchor by `delta` days. Same range rule as months.
    pub fn shift_day(&mut self, delta: i64) -> bool {
        match offset_day(self.day, delta) {
            Some(day) => {
                self.day = day;
                true
            }
            None => false,
        }
    }

    pub fn previous_month(&mut self) -> bool {
        self.shift_month(-1)
    }

    pub fn next_month(&mut self) -> bool {
        self.shift_month(1)
    }

    pub fn previous_day(&mut self) -> bool {
        self.shift_day(-1)
    }

    pub fn next_day(&mut self) -> bool {
        self.shift_day(1)
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarCursor, ViewKind};
    use crate::calendar::YearMonth;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_cursor_starts_on_month_view() {
        let cursor = CalendarCursor::new(date(2024, 3, 31));
        assert_eq!(cursor.view(), ViewKind::Month);
        assert_eq!(cursor.month(), YearMonth::new(2024, 3).unwrap());
        assert_eq!(cursor.day(), date(2024, 3, 31));
    }

    #[test]
    fn month_round_trip_returns_to_start() {
        let mut cursor = CalendarCursor::new(date(2024, 3, 15));
        for _ in 0..3 {
            assert!(cursor.previous_month());
        }
        assert_eq!(cursor.month(), YearMonth::new(2023, 12).unwrap());
        for _ in 0..3 {
            assert!(cursor.next_month());
        }
        assert_eq!(cursor.month(), YearMonth::new(2024, 3).unwrap());
    }

    #[test]
    fn month_steps_do_not_skip_short_months() {
        // Anchored on Jan 31, the next month is still February.
        let mut cursor = CalendarCursor::new(date(2024, 1, 31));
        cursor.next_month();
        assert_eq!(cursor.month(), YearMonth::new(2024, 2).unwrap());
    }

    #[test]
    fn day_and_month_anchors_are_independent() {
        let mut cursor = CalendarCursor::new(date(2024, 3, 1));
        cursor.previous_day();
        assert_eq!(cursor.day(), date(2024, 2, 29));
        assert_eq!(cursor.month(), YearMonth::new(2024, 3).unwrap());

        cursor.next_month();
        assert_eq!(cursor.day(), date(2024, 2, 29));
    }

    #[test]
    fn view_kind_parses_case_insensitively() {
        assert_eq!(" Week ".parse::<ViewKind>(), Ok(ViewKind::Week));
        assert!("year".parse::<ViewKind>().is_err());
        assert_eq!(ViewKind::Day.to_string(), "day");
    }

    #[test]
    fn out_of_range_step_is_refused() {
        let mut cursor = CalendarCursor::new(NaiveDate::MAX);
        assert!(!cursor.next_day());
        assert_eq!(cursor.day(), NaiveDate::MAX);
    }
}

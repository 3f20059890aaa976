//! Calendar arithmetic used by view projection and navigation.
//!
//! # Invariants
//! - Weeks start on Sunday; weekday offsets are `0 = Sunday .. 6 = Saturday`.
//! - Month and day stepping is calendar-correct (month lengths, leap years,
//!   year rollover) and returns `None` only past chrono's supported range.

use chrono::{Datelike, Months, NaiveDate};
use std::fmt::{Display, Formatter};

/// Number of half-hour buckets in one day.
pub const HALF_HOURS_PER_DAY: usize = 48;
/// Number of days in one week column set.
pub const DAYS_PER_WEEK: usize = 7;
/// Sunday-first short weekday labels.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One calendar month, independent of any day within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Returns `None` when `month` is not `1..=12` or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - chrono::Days::new(u64::from(date.day0())))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 1-based month number.
    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Weekday of the 1st, `0 = Sunday`.
    pub fn first_weekday_offset(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }

    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// Steps `delta` months forward (negative steps backward).
    pub fn offset(self, delta: i32) -> Option<Self> {
        let months = Months::new(delta.unsigned_abs());
        if delta >= 0 {
            self.0.checked_add_months(months).map(Self)
        } else {
            self.0.checked_sub_months(months).map(Self)
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Length of `month` (1-based) in `year`. Returns 0 for months outside `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(chrono::Days::new(back)).unwrap_or(date)
}

/// Steps `delta` days forward (negative steps backward).
pub fn offset_day(date: NaiveDate, delta: i64) -> Option<NaiveDate> {
    let days = chrono::Days::new(delta.unsigned_abs());
    if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
}

//! Slot key codec.
//!
//! # Responsibility
//! - Map day and half-hour calendar slots onto canonical string keys.
//! - Parse canonical keys back for callers that address slots by text.
//!
//! # Invariants
//! - Encoding is deterministic: one logical slot, one byte-identical key.
//! - Day keys have 3 `-`-separated fields, half-hour keys have 5; the two
//!   shapes never collide.
//! - Encoding performs no calendar normalization. Callers supply valid dates.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field separator inside canonical keys.
pub const SLOT_KEY_DELIMITER: char = '-';

static SLOT_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?[1-9][0-9]*|0)-([1-9][0-9]?)-([1-9][0-9]?)(?:-([1-9]?[0-9])-(0|30))?$")
        .expect("valid slot key regex")
});

/// Which half of an hour a slot covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HalfHour {
    /// Minutes 0..30, encoded as `0`.
    First,
    /// Minutes 30..60, encoded as `30`.
    Second,
}

impl HalfHour {
    /// Both halves in display order.
    pub const ALL: [HalfHour; 2] = [HalfHour::First, HalfHour::Second];

    /// Minute offset within the hour (`0` or `30`).
    pub fn minute(self) -> u32 {
        match self {
            Self::First => 0,
            Self::Second => 30,
        }
    }

    pub fn from_minute(minute: u32) -> Option<Self> {
        match minute {
            0 => Some(Self::First),
            30 => Some(Self::Second),
            _ => None,
        }
    }
}

/// Address of one schedulable calendar bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// Whole-day bucket used by month view.
    Day { year: i32, month: u32, day: u32 },
    /// Half-hour bucket used by week and day views.
    HalfHour {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        half: HalfHour,
    },
}

impl SlotKey {
    pub fn day(year: i32, month: u32, day: u32) -> Self {
        Self::Day { year, month, day }
    }

    pub fn half_hour(year: i32, month: u32, day: u32, hour: u32, half: HalfHour) -> Self {
        Self::HalfHour {
            year,
            month,
            day,
            hour,
            half,
        }
    }

    /// Day bucket for a calendar date.
    pub fn for_date(date: NaiveDate) -> Self {
        Self::day(date.year(), date.month(), date.day())
    }

    /// Half-hour bucket on a calendar date.
    pub fn for_date_half_hour(date: NaiveDate, hour: u32, half: HalfHour) -> Self {
        Self::half_hour(date.year(), date.month(), date.day(), hour, half)
    }

    pub fn is_day(&self) -> bool {
        matches!(self, Self::Day { .. })
    }

    /// Canonical text used as the schedule store key.
    pub fn canonical(&self) -> String {
        match *self {
            Self::Day { year, month, day } => day_key(year, month, day),
            Self::HalfHour {
                year,
                month,
                day,
                hour,
                half,
            } => half_hour_key(year, month, day, hour, half),
        }
    }

    /// Parses a canonical key.
    ///
    /// Only the exact canonical shapes are accepted: no zero padding, no
    /// surrounding whitespace, `hour <= 23`, half `0` or `30`. Day-of-month
    /// validity is checked against the calendar.
    ///
    /// # Errors
    /// - `SlotKeyParseError::Malformed` when the text is not a canonical key.
    /// - `SlotKeyParseError::OutOfRange` when fields name no real slot.
    pub fn parse(text: &str) -> Result<Self, SlotKeyParseError> {
        let captures = SLOT_KEY_RE
            .captures(text)
            .ok_or_else(|| SlotKeyParseError::Malformed(text.to_string()))?;

        let field = |index: usize| -> Result<i64, SlotKeyParseError> {
            captures
                .get(index)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .ok_or_else(|| SlotKeyParseError::Malformed(text.to_string()))
        };
        let out_of_range = || SlotKeyParseError::OutOfRange(text.to_string());

        let year = i32::try_from(field(1)?).map_err(|_| out_of_range())?;
        let month = u32::try_from(field(2)?).map_err(|_| out_of_range())?;
        let day = u32::try_from(field(3)?).map_err(|_| out_of_range())?;
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(out_of_range());
        }

        if captures.get(4).is_none() {
            return Ok(Self::day(year, month, day));
        }

        let hour = u32::try_from(field(4)?).map_err(|_| out_of_range())?;
        if hour > 23 {
            return Err(out_of_range());
        }
        let minute = u32::try_from(field(5)?).map_err(|_| out_of_range())?;
        let half = HalfHour::from_minute(minute).ok_or_else(out_of_range)?;
        Ok(Self::half_hour(year, month, day, hour, half))
    }
}

impl Display for SlotKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Errors from [`SlotKey::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKeyParseError {
    Malformed(String),
    OutOfRange(String),
}

impl Display for SlotKeyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(
                f,
                "`{value}` is not a slot key (expected Y-M-D or Y-M-D-H-0|30)"
            ),
            Self::OutOfRange(value) => write!(f, "slot key `{value}` names no calendar slot"),
        }
    }
}

impl Error for SlotKeyParseError {}

/// Day-granularity key: `year-month-day`, 1-based month and day, unpadded.
pub fn day_key(year: i32, month: u32, day: u32) -> String {
    let d = SLOT_KEY_DELIMITER;
    format!("{year}{d}{month}{d}{day}")
}

/// Half-hour key: `year-month-day-hour-half` with half `0` or `30`.
pub fn half_hour_key(year: i32, month: u32, day: u32, hour: u32, half: HalfHour) -> String {
    let d = SLOT_KEY_DELIMITER;
    format!("{year}{d}{month}{d}{day}{d}{hour}{d}{}", half.minute())
}

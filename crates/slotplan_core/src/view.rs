//! Read-only month/week/day projections over the schedule store.
//!
//! # Responsibility
//! - Enumerate the slot keys each view shows and copy their contents out.
//!
//! # Invariants
//! - Projections never mutate the store and share no state with it.
//! - Month view uses day keys; week and day views use half-hour keys.
//! - A day always has exactly 48 half-hour slots in time order.

use crate::calendar::{self, YearMonth, DAYS_PER_WEEK, HALF_HOURS_PER_DAY};
use crate::model::slot_key::{HalfHour, SlotKey};
use crate::model::task::Task;
use crate::schedule::ScheduleStore;
use chrono::{Datelike, NaiveDate};

/// One day cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// 1-based day of month.
    pub day: u32,
    pub key: SlotKey,
    pub tasks: Vec<Task>,
}

/// Month grid contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub month: YearMonth,
    /// Weekday of day 1 (`0 = Sunday`); number of blank leading cells.
    pub first_weekday_offset: u32,
    /// Days `1..=days_in_month`, in order.
    pub days: Vec<DayCell>,
}

impl MonthView {
    /// Lays the days out in Sunday-first rows of up to 7 cells.
    ///
    /// `None` cells pad the first row up to the weekday of day 1. A new row
    /// starts every 7 cells; the last row is emitted even when short and is
    /// not padded.
    pub fn rows(&self) -> Vec<Vec<Option<&DayCell>>> {
        let offset = self.first_weekday_offset as usize;
        let mut rows = Vec::new();
        let mut current: Vec<Option<&DayCell>> = vec![None; offset];

        for (index, cell) in self.days.iter().enumerate() {
            current.push(Some(cell));
            if (offset + index + 1) % DAYS_PER_WEEK == 0 {
                rows.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            rows.push(current);
        }
        rows
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.days.iter().find(|cell| cell.day == day)
    }
}

/// One half-hour bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfHourSlot {
    pub hour: u32,
    pub half: HalfHour,
    pub key: SlotKey,
    pub tasks: Vec<Task>,
}

impl HalfHourSlot {
    /// Start time as `H:MM`, e.g. `9:30`.
    pub fn label(&self) -> String {
        format!("{}:{:02}", self.hour, self.half.minute())
    }
}

/// Half-hour schedule of one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub date: NaiveDate,
    /// 48 slots: `0:00, 0:30, 1:00 .. 23:30`.
    pub slots: Vec<HalfHourSlot>,
}

impl DayView {
    pub fn slot(&self, hour: u32, half: HalfHour) -> Option<&HalfHourSlot> {
        self.slots
            .iter()
            .find(|slot| slot.hour == hour && slot.half == half)
    }

    /// Column header text, e.g. `5/10`.
    pub fn header(&self) -> String {
        format!("{}/{}", self.date.month(), self.date.day())
    }
}

/// Seven Sunday-first day columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub columns: Vec<DayView>,
}

impl WeekView {
    /// Slots sharing one half-hour row across the week (`row` in `0..48`).
    pub fn row(&self, row: usize) -> Vec<&HalfHourSlot> {
        self.columns
            .iter()
            .filter_map(|column| column.slots.get(row))
            .collect()
    }
}

/// Projects `month` from day-granularity keys.
pub fn month_view(month: YearMonth, store: &ScheduleStore) -> MonthView {
    let days = (1..=month.days())
        .map(|day| {
            let key = SlotKey::day(month.year(), month.month(), day);
            DayCell {
                day,
                tasks: store.get(&key),
                key,
            }
        })
        .collect();

    MonthView {
        month,
        first_weekday_offset: month.first_weekday_offset(),
        days,
    }
}

/// Projects the Sunday-first week containing `anchor`.
pub fn week_view(anchor: NaiveDate, store: &ScheduleStore) -> WeekView {
    let week_start = calendar::week_start(anchor);
    let columns = week_start
        .iter_days()
        .take(DAYS_PER_WEEK)
        .map(|date| day_view(date, store))
        .collect();

    WeekView {
        week_start,
        columns,
    }
}

/// Projects the 48 half-hour slots of `date`.
pub fn day_view(date: NaiveDate, store: &ScheduleStore) -> DayView {
    let mut slots = Vec::with_capacity(HALF_HOURS_PER_DAY);
    for hour in 0..24 {
        for half in HalfHour::ALL {
            let key = SlotKey::for_date_half_hour(date, hour, half);
            slots.push(HalfHourSlot {
                hour,
                half,
                tasks: store.get(&key),
                key,
            });
        }
    }
    DayView { date, slots }
}

#[cfg(test)]
mod tests {
    use super::{day_view, month_view, week_view};
    use crate::calendar::YearMonth;
    use crate::model::slot_key::{HalfHour, SlotKey};
    use crate::model::task::{Task, TaskId};
    use crate::schedule::ScheduleStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, text: &str) -> Task {
        Task::new(TaskId::new(id), text).unwrap()
    }

    #[test]
    fn february_2023_has_28_days_and_offset_3() {
        let view = month_view(YearMonth::new(2023, 2).unwrap(), &ScheduleStore::new());
        assert_eq!(view.days.len(), 28);
        assert_eq!(view.first_weekday_offset, 3);
        assert_eq!(view.days.last().unwrap().key.canonical(), "2023-2-28");
    }

    #[test]
    fn month_rows_pad_front_and_flush_short_tail() {
        let view = month_view(YearMonth::new(2023, 2).unwrap(), &ScheduleStore::new());
        let rows = view.rows();

        // 3 blanks + 28 days = 31 cells -> 4 full rows and a 3-cell tail.
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].iter().filter(|c| c.is_none()).count(), 3);
        assert_eq!(rows[0][3].unwrap().day, 1);
        assert_eq!(rows[1][0].unwrap().day, 5);
        assert_eq!(rows[4].len(), 3);
        assert_eq!(rows[4][2].unwrap().day, 28);
    }

    #[test]
    fn month_starting_sunday_has_no_padding() {
        // 2026-02-01 is a Sunday; 28 days fill exactly 4 rows.
        let view = month_view(YearMonth::new(2026, 2).unwrap(), &ScheduleStore::new());
        assert_eq!(view.first_weekday_offset, 0);
        let rows = view.rows();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.len() == 7));
    }

    #[test]
    fn month_view_reads_only_day_keys() {
        let mut store = ScheduleStore::new();
        store.place(&SlotKey::day(2024, 5, 10), &task(1, "Buy milk"));
        store.place(
            &SlotKey::half_hour(2024, 5, 11, 9, HalfHour::First),
            &task(2, "Dentist"),
        );

        let view = month_view(YearMonth::new(2024, 5).unwrap(), &store);
        assert_eq!(view.day(10).unwrap().tasks[0].text, "Buy milk");
        assert!(view.day(11).unwrap().tasks.is_empty());
    }

    #[test]
    fn day_view_has_48_ordered_slots() {
        let mut store = ScheduleStore::new();
        store.place(
            &SlotKey::half_hour(2024, 5, 10, 13, HalfHour::Second),
            &task(1, "Lunch"),
        );

        let view = day_view(date(2024, 5, 10), &store);
        assert_eq!(view.slots.len(), 48);
        assert_eq!(view.slots[0].label(), "0:00");
        assert_eq!(view.slots[1].label(), "0:30");
        assert_eq!(view.slots[47].label(), "23:30");
        assert_eq!(view.slots[27].key.canonical(), "2024-5-10-13-30");
        assert_eq!(
            view.slot(13, HalfHour::Second).unwrap().tasks[0].text,
            "Lunch"
        );
        assert!(view.slot(13, HalfHour::First).unwrap().tasks.is_empty());
    }

    #[test]
    fn day_view_ignores_day_keys() {
        let mut store = ScheduleStore::new();
        store.place(&SlotKey::day(2024, 5, 10), &task(1, "Buy milk"));

        let view = day_view(date(2024, 5, 10), &store);
        assert!(view.slots.iter().all(|slot| slot.tasks.is_empty()));
    }

    #[test]
    fn week_view_spans_sunday_to_saturday() {
        let mut store = ScheduleStore::new();
        store.place(
            &SlotKey::half_hour(2025, 1, 3, 8, HalfHour::First),
            &task(1, "Standup"),
        );

        let view = week_view(date(2025, 1, 1), &store);
        assert_eq!(view.week_start, date(2024, 12, 29));
        assert_eq!(view.columns.len(), 7);
        assert_eq!(view.columns[0].header(), "12/29");
        assert_eq!(view.columns[6].date, date(2025, 1, 4));
        assert!(view.columns.iter().all(|c| c.slots.len() == 48));

        let row = view.row(16);
        assert_eq!(row.len(), 7);
        assert_eq!(row[5].tasks[0].text, "Standup");
        assert!(view.row(48).is_empty());
    }
}

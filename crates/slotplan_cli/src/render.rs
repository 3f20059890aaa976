//! Plain-text rendering of tasks and calendar projections.

use slotplan_core::calendar::WEEKDAY_LABELS;
use slotplan_core::{DayView, MonthView, Task, WeekView};
use std::fmt::Write;

pub fn task_line(task: &Task) -> String {
    format!("{}\t{}", task.id, task.text)
}

pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "(no tasks)\n".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(out, "{}", task_line(task));
    }
    out
}

/// Month grid followed by the tasks of each non-empty day.
pub fn month(view: &MonthView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.month);
    let _ = writeln!(out, "{}", WEEKDAY_LABELS.map(|label| format!("{label:>4}")).join(""));

    for row in view.rows() {
        let mut line = String::new();
        for cell in row {
            match cell {
                Some(cell) if !cell.tasks.is_empty() => {
                    let _ = write!(line, "{:>3}*", cell.day);
                }
                Some(cell) => {
                    let _ = write!(line, "{:>4}", cell.day);
                }
                None => line.push_str("    "),
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    for cell in view.days.iter().filter(|cell| !cell.tasks.is_empty()) {
        let _ = writeln!(out, "\n{}:", cell.key);
        for task in &cell.tasks {
            let _ = writeln!(out, "  {}", task_line(task));
        }
    }
    out
}

/// Only occupied half-hours are listed.
pub fn day(view: &DayView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", view.date, view.header());
    let mut empty = true;
    for slot in view.slots.iter().filter(|slot| !slot.tasks.is_empty()) {
        empty = false;
        for task in &slot.tasks {
            let _ = writeln!(out, "{:>5}  {}", slot.label(), task_line(task));
        }
    }
    if empty {
        out.push_str("(nothing scheduled)\n");
    }
    out
}

pub fn week(view: &WeekView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "week of {}", view.week_start);
    for (label, column) in WEEKDAY_LABELS.iter().zip(&view.columns) {
        let _ = write!(out, "\n{label} ");
        out.push_str(&day(column));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{day, month, task_list};
    use chrono::NaiveDate;
    use slotplan_core::{
        day_view, month_view, HalfHour, ScheduleStore, SlotKey, Task, TaskId, YearMonth,
    };

    #[test]
    fn empty_task_list_has_placeholder() {
        assert_eq!(task_list(&[]), "(no tasks)\n");
    }

    #[test]
    fn month_marks_busy_days() {
        let mut store = ScheduleStore::new();
        let task = Task::new(TaskId::new(7), "Buy milk").unwrap();
        store.place(&SlotKey::day(2023, 2, 14), &task);

        let text = month(&month_view(YearMonth::new(2023, 2).unwrap(), &store));
        assert!(text.starts_with("2023-02\n"));
        assert!(text.contains(" 14*"));
        assert!(text.contains("2023-2-14:\n  7\tBuy milk"));
    }

    #[test]
    fn day_lists_only_occupied_slots() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut store = ScheduleStore::new();
        let task = Task::new(TaskId::new(3), "Lunch").unwrap();
        store.place(&SlotKey::for_date_half_hour(date, 12, HalfHour::Second), &task);

        let text = day(&day_view(date, &store));
        assert_eq!(text, "2024-05-10 (5/10)\n12:30  3\tLunch\n");
        assert!(day(&day_view(date, &ScheduleStore::new())).contains("nothing scheduled"));
    }
}

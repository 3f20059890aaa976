//! Core domain logic for SlotPlan.
//! This crate is the single source of truth for scheduling invariants.

pub mod calendar;
pub mod cursor;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod registry;
pub mod schedule;
pub mod service;
pub mod transfer;
pub mod view;

pub use calendar::YearMonth;
pub use cursor::{CalendarCursor, ViewKind};
pub use kv::{KvError, KvStore, MemoryKvStore, SqliteKvStore, SCHEDULE_KEY, TODOS_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::slot_key::{day_key, half_hour_key, HalfHour, SlotKey, SlotKeyParseError};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use registry::{AddTaskError, TaskRegistry};
pub use schedule::ScheduleStore;
pub use service::planner::{Planner, PlannerError, PlannerResult};
pub use transfer::{DragHandle, DropOutcome};
pub use view::{day_view, month_view, week_view, DayView, HalfHourSlot, MonthView, WeekView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

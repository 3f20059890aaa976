//! Planner use-case service.
//!
//! # Responsibility
//! - Own the task registry, schedule store, drag protocol and view cursor.
//! - Sequence every mutation as "mutate in memory, then persist".
//! - Restore both stores from the key-value collaborator at startup.
//!
//! # Invariants
//! - Deleting a task always removes its snapshots from every slot.
//! - No slot ever holds a snapshot of a task missing from the registry.
//! - Blank task text is a silent no-op, not an error.
//! - Malformed persisted data starts the affected store empty.

use crate::calendar::YearMonth;
use crate::cursor::{CalendarCursor, ViewKind};
use crate::kv::{KvError, KvStore, SCHEDULE_KEY, TODOS_KEY};
use crate::model::slot_key::SlotKey;
use crate::model::task::{Task, TaskId};
use crate::registry::{AddTaskError, TaskRegistry};
use crate::schedule::ScheduleStore;
use crate::transfer::{DragHandle, DropOutcome, TransferProtocol};
use crate::view::{self, DayView, MonthView, WeekView};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Errors surfaced by planner operations.
///
/// In-memory state has already changed when a persistence error is returned.
#[derive(Debug)]
pub enum PlannerError {
    /// Every task id up to `i64::MAX` is taken; nothing was added.
    IdsExhausted,
    Storage(KvError),
    Serialize(serde_json::Error),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdsExhausted => write!(f, "{}", AddTaskError::IdsExhausted),
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::Serialize(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::IdsExhausted => None,
        }
    }
}

impl From<KvError> for PlannerError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Explicitly owned planner state.
pub struct Planner<S: KvStore> {
    store: S,
    registry: TaskRegistry,
    schedule: ScheduleStore,
    transfer: TransferProtocol,
    cursor: CalendarCursor,
}

impl<S: KvStore> Planner<S> {
    /// Loads both stores; anchors the cursor on today's local date.
    pub fn load(store: S) -> PlannerResult<Self> {
        Self::load_at(store, Local::now().date_naive())
    }

    /// Loads both stores; anchors the cursor on `today`.
    ///
    /// # Errors
    /// - `PlannerError::Storage` when the backend cannot be read. Unparseable
    ///   content is not an error: that store starts empty.
    pub fn load_at(store: S, today: NaiveDate) -> PlannerResult<Self> {
        let registry = match store.load(TODOS_KEY)? {
            None => TaskRegistry::new(),
            Some(text) => parse_registry(&text).unwrap_or_else(|err| {
                warn!(
                    "event=store_load module=planner status=skip key={TODOS_KEY} error={err}"
                );
                TaskRegistry::new()
            }),
        };

        let mut schedule = match store.load(SCHEDULE_KEY)? {
            None => ScheduleStore::new(),
            Some(text) => serde_json::from_str::<ScheduleStore>(&text).unwrap_or_else(|err| {
                warn!(
                    "event=store_load module=planner status=skip key={SCHEDULE_KEY} error={err}"
                );
                ScheduleStore::new()
            }),
        };

        let orphans = schedule.retain_tasks(|id| registry.contains(id));
        if orphans > 0 {
            warn!(
                "event=store_load module=planner status=ok key={SCHEDULE_KEY} dropped_orphans={orphans}"
            );
        }

        info!(
            "event=planner_load module=planner status=ok tasks={} slots={}",
            registry.len(),
            schedule.len()
        );

        Ok(Self {
            store,
            registry,
            schedule,
            transfer: TransferProtocol::new(),
            cursor: CalendarCursor::new(today),
        })
    }

    /// Adds a task to the end of the unscheduled list.
    ///
    /// Returns `Ok(None)` without touching storage when `text` is blank.
    ///
    /// # Errors
    /// - `PlannerError::IdsExhausted` when no fresh id is left.
    pub fn add_task(&mut self, text: &str) -> PlannerResult<Option<Task>> {
        let task = match self.registry.add(text) {
            Ok(task) => task,
            Err(AddTaskError::EmptyText) => {
                debug!("event=task_add module=planner status=skip reason=blank_text");
                return Ok(None);
            }
            Err(AddTaskError::IdsExhausted) => {
                warn!("event=task_add module=planner status=error reason=ids_exhausted");
                return Err(PlannerError::IdsExhausted);
            }
        };
        self.persist_registry()?;
        info!(
            "event=task_add module=planner status=ok task_id={} text_len={}",
            task.id,
            task.text.chars().count()
        );
        Ok(Some(task))
    }

    /// Deletes a task and every scheduled snapshot of it.
    ///
    /// Returns whether the task existed. Unknown ids are a no-op.
    pub fn delete_task(&mut self, id: TaskId) -> PlannerResult<bool> {
        let removed = self.registry.remove(id);
        let unscheduled = self.schedule.remove_task_everywhere(id);

        if removed.is_some() {
            self.persist_registry()?;
        }
        if unscheduled > 0 {
            self.persist_schedule()?;
        }

        info!(
            "event=task_delete module=planner status={} task_id={id} unscheduled={unscheduled}",
            if removed.is_some() { "ok" } else { "skip" }
        );
        Ok(removed.is_some())
    }

    /// Starts dragging a registry task. `None` for unknown ids.
    pub fn begin_drag(&mut self, id: TaskId) -> Option<DragHandle> {
        let handle = self.transfer.begin(&self.registry, id);
        debug!(
            "event=drag_begin module=planner status={} task_id={id}",
            if handle.is_some() { "ok" } else { "skip" }
        );
        handle
    }

    /// Completes a drag on `target` (`None` = released outside any slot).
    pub fn complete_drag(
        &mut self,
        handle: DragHandle,
        target: Option<&SlotKey>,
    ) -> PlannerResult<DropOutcome> {
        let task_id = handle.task_id();
        let outcome = self
            .transfer
            .complete(handle, target, &self.registry, &mut self.schedule);
        self.finish_drop(task_id, target, outcome)
    }

    /// Abandons the active drag without any store mutation.
    pub fn cancel_drag(&mut self) -> bool {
        self.transfer.cancel()
    }

    pub fn is_dragging(&self) -> bool {
        self.transfer.is_dragging()
    }

    /// Places `id` straight onto `target` in one call.
    ///
    /// An in-progress drag keeps its handle. Returns
    /// `DropOutcome::TaskMissing` for unknown ids.
    pub fn schedule_task(&mut self, id: TaskId, target: &SlotKey) -> PlannerResult<DropOutcome> {
        let outcome = self
            .transfer
            .place_now(id, target, &self.registry, &mut self.schedule);
        self.finish_drop(id, Some(target), outcome)
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        self.registry.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.registry.get(id)
    }

    /// Copy of one slot's contents.
    pub fn slot(&self, key: &SlotKey) -> Vec<Task> {
        self.schedule.get(key)
    }

    pub fn schedule(&self) -> &ScheduleStore {
        &self.schedule
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn cursor(&self) -> &CalendarCursor {
        &self.cursor
    }

    pub fn set_view(&mut self, view: ViewKind) {
        self.cursor.set_view(view);
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.cursor.set_month(month);
    }

    pub fn set_day(&mut self, day: NaiveDate) {
        self.cursor.set_day(day);
    }

    pub fn previous_month(&mut self) -> bool {
        self.cursor.previous_month()
    }

    pub fn next_month(&mut self) -> bool {
        self.cursor.next_month()
    }

    pub fn previous_day(&mut self) -> bool {
        self.cursor.previous_day()
    }

    pub fn next_day(&mut self) -> bool {
        self.cursor.next_day()
    }

    /// Month grid at the cursor's month anchor.
    pub fn month_view(&self) -> MonthView {
        view::month_view(self.cursor.month(), &self.schedule)
    }

    /// Week containing today's local date.
    pub fn week_view(&self) -> WeekView {
        view::week_view(Local::now().date_naive(), &self.schedule)
    }

    /// Half-hour schedule at the cursor's day anchor.
    pub fn day_view(&self) -> DayView {
        view::day_view(self.cursor.day(), &self.schedule)
    }

    /// Releases the storage backend.
    pub fn into_store(self) -> S {
        self.store
    }

    fn finish_drop(
        &mut self,
        task_id: TaskId,
        target: Option<&SlotKey>,
        outcome: DropOutcome,
    ) -> PlannerResult<DropOutcome> {
        if outcome == DropOutcome::Placed {
            self.persist_schedule()?;
        }
        info!(
            "event=drag_drop module=planner status=ok task_id={task_id} granularity={} outcome={}",
            target.map_or("none", |key| if key.is_day() { "day" } else { "half_hour" }),
            outcome.as_str()
        );
        Ok(outcome)
    }

    fn persist_registry(&mut self) -> PlannerResult<()> {
        let json = serde_json::to_string(&self.registry)?;
        self.store.save(TODOS_KEY, &json)?;
        Ok(())
    }

    fn persist_schedule(&mut self) -> PlannerResult<()> {
        let json = serde_json::to_string(&self.schedule)?;
        self.store.save(SCHEDULE_KEY, &json)?;
        Ok(())
    }
}

fn parse_registry(text: &str) -> Result<TaskRegistry, Box<dyn Error>> {
    let tasks: Vec<Task> = serde_json::from_str(text)?;
    Ok(TaskRegistry::from_tasks(tasks)?)
}

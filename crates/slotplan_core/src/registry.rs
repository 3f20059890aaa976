//! Task registry: the ordered, unscheduled todo list.
//!
//! # Responsibility
//! - Own the canonical copy of every task and its display order.
//! - Issue task ids.
//!
//! # Invariants
//! - Insertion order is display order.
//! - Ids are unique and strictly increasing in issue order; an id is never
//!   issued twice in one process, even after the task is removed.
//! - Once `i64::MAX` is issued, further adds fail instead of reusing it.
//! - Removal is crate-private: the planner pairs it with the schedule cascade.

use crate::model::task::{normalize_task_text, Task, TaskId, TaskValidationError};
use chrono::Utc;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted registry data that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryDataError {
    DuplicateTaskId(TaskId),
}

impl Display for RegistryDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTaskId(id) => write!(f, "duplicate task id in registry: {id}"),
        }
    }
}

impl Error for RegistryDataError {}

/// Reasons a task cannot be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTaskError {
    /// Text is empty or whitespace-only.
    EmptyText,
    /// No id above the highest issued one is left.
    IdsExhausted,
}

impl Display for AddTaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "{}", TaskValidationError::EmptyText),
            Self::IdsExhausted => write!(f, "no unused task id is left"),
        }
    }
}

impl Error for AddTaskError {}

impl From<TaskValidationError> for AddTaskError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::EmptyText => Self::EmptyText,
        }
    }
}

/// Master list of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    last_issued: Option<i64>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from persisted tasks, keeping their order.
    ///
    /// # Errors
    /// - `RegistryDataError::DuplicateTaskId` when two tasks share an id.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, RegistryDataError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id) {
                return Err(RegistryDataError::DuplicateTaskId(task.id));
            }
        }
        let last_issued = tasks.iter().map(|task| task.id.get()).max();
        Ok(Self { tasks, last_issued })
    }

    /// Appends a new task stamped with the current time.
    ///
    /// # Errors
    /// - `AddTaskError::EmptyText` for blank input; nothing is added.
    /// - `AddTaskError::IdsExhausted` once `i64::MAX` has been issued.
    pub fn add(&mut self, text: &str) -> Result<Task, AddTaskError> {
        self.add_at(text, Utc::now().timestamp_millis())
    }

    /// Appends a new task using `now_ms` as the creation time.
    ///
    /// When `now_ms` does not exceed the last issued id (same millisecond,
    /// clock going backwards) the id is bumped past it.
    pub fn add_at(&mut self, text: &str, now_ms: i64) -> Result<Task, AddTaskError> {
        let text = normalize_task_text(text)?;
        let id = self.next_id(now_ms).ok_or(AddTaskError::IdsExhausted)?;
        let task = Task::new(id, &text)?;
        self.last_issued = Some(id.get());
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn next_id(&self, now_ms: i64) -> Option<TaskId> {
        match self.last_issued {
            Some(last) if now_ms <= last => last.checked_add(1).map(TaskId::new),
            _ => Some(TaskId::new(now_ms)),
        }
    }
}

impl Serialize for TaskRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tasks.serialize(serializer)
    }
}

//! Task domain model.
//!
//! # Responsibility
//! - Define the todo record shared by the registry and schedule snapshots.
//! - Validate user-entered text before a task can exist.
//!
//! # Invariants
//! - `id` is unique within one registry and never reused after deletion.
//! - `text` is never blank.
//! - `completed` is carried for data-shape fidelity; no core path reads it.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one task.
///
/// Values are creation-time epoch milliseconds, so ordering by id matches
/// creation order. Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for task construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty or whitespace-only.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// One todo item.
///
/// The registry owns the canonical copy; schedule slots hold snapshots taken
/// when the task was dropped there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskWire")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    /// Reserved. Always `false` for tasks created by this crate.
    pub completed: bool,
}

impl Task {
    /// Creates an uncompleted task from raw user input.
    ///
    /// Leading/trailing whitespace is trimmed before storing.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyText` when nothing remains after trimming.
    pub fn new(id: TaskId, text: &str) -> Result<Self, TaskValidationError> {
        Ok(Self {
            id,
            text: normalize_task_text(text)?,
            completed: false,
        })
    }

    /// Validates invariants for tasks read back from storage.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Trims task input and rejects blank values.
pub fn normalize_task_text(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

#[derive(Deserialize)]
struct TaskWire {
    id: TaskId,
    text: String,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<TaskWire> for Task {
    type Error = TaskValidationError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let task = Self {
            id: wire.id,
            text: wire.text,
            completed: wire.completed,
        };
        task.validate()?;
        Ok(task)
    }
}

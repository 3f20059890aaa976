//! Schedule store: slot key -> ordered task snapshots.
//!
//! # Responsibility
//! - Hold every scheduled placement in one flat map keyed by canonical slot key.
//! - Enforce per-slot duplicate suppression.
//!
//! # Invariants
//! - Within one slot, task ids are unique.
//! - One task may appear in any number of different slots.
//! - Every stored key is a canonical `SlotKey`; no stored sequence is empty.
//! - Reads hand out owned copies, never views into the map.

use crate::model::slot_key::{SlotKey, SlotKeyParseError};
use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Flat mapping from canonical slot keys to task snapshots.
///
/// Serialized as a JSON object: property names are slot keys, values are
/// arrays of `{id, text, completed}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<Task>>")]
pub struct ScheduleStore {
    slots: BTreeMap<String, Vec<Task>>,
}

/// Persisted schedule data that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDataError {
    InvalidSlotKey(SlotKeyParseError),
}

impl Display for ScheduleDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlotKey(err) => write!(f, "invalid schedule entry: {err}"),
        }
    }
}

impl Error for ScheduleDataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSlotKey(err) => Some(err),
        }
    }
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot of `task` to the slot at `key`.
    ///
    /// Returns `false` (and changes nothing) when a snapshot with the same
    /// task id is already in that slot.
    pub fn place(&mut self, key: &SlotKey, task: &Task) -> bool {
        let slot = self.slots.entry(key.canonical()).or_default();
        if slot.iter().any(|existing| existing.id == task.id) {
            return false;
        }
        slot.push(task.clone());
        true
    }

    /// Returns a copy of the slot contents; empty when never populated.
    pub fn get(&self, key: &SlotKey) -> Vec<Task> {
        self.slots.get(&key.canonical()).cloned().unwrap_or_default()
    }

    /// Returns whether `task_id` is scheduled at `key`.
    pub fn contains(&self, key: &SlotKey, task_id: TaskId) -> bool {
        self.slots
            .get(&key.canonical())
            .is_some_and(|slot| slot.iter().any(|task| task.id == task_id))
    }

    /// Drops every snapshot of `task_id` from every slot.
    ///
    /// Slots left empty are pruned. Returns the number of snapshots removed.
    pub fn remove_task_everywhere(&mut self, task_id: TaskId) -> usize {
        self.retain_tasks(|id| id != task_id)
    }

    /// Canonical keys of every slot holding `task_id`, in key order.
    pub fn slots_for_task(&self, task_id: TaskId) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.iter().any(|task| task.id == task_id))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Iterates populated slots in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Task])> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.as_str(), slot.as_slice()))
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drops snapshots whose id fails `keep`, pruning emptied slots.
    ///
    /// Returns the number of snapshots removed.
    pub(crate) fn retain_tasks(&mut self, mut keep: impl FnMut(TaskId) -> bool) -> usize {
        let mut removed = 0;
        self.slots.retain(|_, slot| {
            let before = slot.len();
            slot.retain(|task| keep(task.id));
            removed += before - slot.len();
            !slot.is_empty()
        });
        removed
    }
}

impl Serialize for ScheduleStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.slots.serialize(serializer)
    }
}

impl TryFrom<BTreeMap<String, Vec<Task>>> for ScheduleStore {
    type Error = ScheduleDataError;

    fn try_from(raw: BTreeMap<String, Vec<Task>>) -> Result<Self, Self::Error> {
        let mut store = Self::new();
        for (key, tasks) in raw {
            let slot_key = SlotKey::parse(&key).map_err(ScheduleDataError::InvalidSlotKey)?;
            for task in &tasks {
                store.place(&slot_key, task);
            }
        }
        store.slots.retain(|_, slot| !slot.is_empty());
        Ok(store)
    }
}

//! Drag-and-drop transfer protocol.
//!
//! # Responsibility
//! - Track the single active drag of a registry task.
//! - Turn a completed drop into one schedule placement.
//!
//! # Invariants
//! - At most one drag is active; starting a new drag supersedes the old one.
//! - Every `complete` returns the protocol to `Idle`, except for a stale
//!   handle, which leaves the current drag untouched.
//! - Only tasks still present in the registry are ever placed.

use crate::model::slot_key::SlotKey;
use crate::model::task::{Task, TaskId};
use crate::registry::TaskRegistry;
use crate::schedule::ScheduleStore;

/// Protocol state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// Holds the snapshot taken when the drag started.
    Dragging { task: Task, generation: u64 },
}

/// Proof of an in-flight drag, consumed by [`TransferProtocol::complete`].
#[derive(Debug, PartialEq, Eq)]
pub struct DragHandle {
    task_id: TaskId,
    generation: u64,
}

impl DragHandle {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }
}

/// Result of completing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// A snapshot was appended to the target slot.
    Placed,
    /// The task was already in the target slot; nothing changed.
    Duplicate,
    /// Released outside any slot; nothing changed.
    NoTarget,
    /// The handle does not belong to the active drag; nothing changed.
    NoActiveDrag,
    /// The dragged task was deleted mid-drag; nothing changed.
    TaskMissing,
}

impl DropOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Duplicate => "duplicate",
            Self::NoTarget => "no_target",
            Self::NoActiveDrag => "no_active_drag",
            Self::TaskMissing => "task_missing",
        }
    }
}

/// Single-pointer drag state machine.
#[derive(Debug, Default)]
pub struct TransferProtocol {
    state: DragState,
    next_generation: u64,
}

impl TransferProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Starts dragging a registry task.
    ///
    /// Returns `None` (state unchanged) when `task_id` is not in the registry.
    pub fn begin(&mut self, registry: &TaskRegistry, task_id: TaskId) -> Option<DragHandle> {
        let task = registry.get(task_id)?.clone();
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.state = DragState::Dragging { task, generation };
        Some(DragHandle {
            task_id,
            generation,
        })
    }

    /// Drops the dragged task on `target` (`None` = outside any slot).
    pub fn complete(
        &mut self,
        handle: DragHandle,
        target: Option<&SlotKey>,
        registry: &TaskRegistry,
        schedule: &mut ScheduleStore,
    ) -> DropOutcome {
        let is_current = matches!(
            &self.state,
            DragState::Dragging { generation, .. } if *generation == handle.generation
        );
        if !is_current {
            return DropOutcome::NoActiveDrag;
        }

        let DragState::Dragging { task, .. } = std::mem::take(&mut self.state) else {
            return DropOutcome::NoActiveDrag;
        };

        let Some(target) = target else {
            return DropOutcome::NoTarget;
        };
        if !registry.contains(task.id) {
            return DropOutcome::TaskMissing;
        }
        place_snapshot(target, &task, schedule)
    }

    /// Places a registry task on `target` without going through a drag.
    ///
    /// The active drag, if any, is left as it was.
    pub fn place_now(
        &self,
        task_id: TaskId,
        target: &SlotKey,
        registry: &TaskRegistry,
        schedule: &mut ScheduleStore,
    ) -> DropOutcome {
        match registry.get(task_id) {
            Some(task) => place_snapshot(target, task, schedule),
            None => DropOutcome::TaskMissing,
        }
    }

    /// Abandons the active drag. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}

fn place_snapshot(target: &SlotKey, task: &Task, schedule: &mut ScheduleStore) -> DropOutcome {
    if schedule.place(target, task) {
        DropOutcome::Placed
    } else {
        DropOutcome::Duplicate
    }
}

#[cfg(test)]
mod tests {
    use super::{DragState, DropOutcome, TransferProtocol};
    use crate::model::slot_key::{HalfHour, SlotKey};
    use crate::model::task::TaskId;
    use crate::registry::TaskRegistry;
    use crate::schedule::ScheduleStore;

    fn setup() -> (TaskRegistry, ScheduleStore, TransferProtocol) {
        let mut registry = TaskRegistry::new();
        registry.add_at("Buy milk", 100).unwrap();
        registry.add_at("Call mom", 200).unwrap();
        (registry, ScheduleStore::new(), TransferProtocol::new())
    }

    #[test]
    fn drop_on_slot_places_snapshot() {
        let (registry, mut schedule, mut transfer) = setup();
        let key = SlotKey::day(2024, 5, 10);

        let handle = transfer.begin(&registry, TaskId::new(100)).unwrap();
        assert!(transfer.is_dragging());

        let outcome = transfer.complete(handle, Some(&key), &registry, &mut schedule);
        assert_eq!(outcome, DropOutcome::Placed);
        assert_eq!(*transfer.state(), DragState::Idle);
        assert_eq!(schedule.get(&key)[0].text, "Buy milk");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn redrop_is_duplicate() {
        let (registry, mut schedule, mut transfer) = setup();
        let key = SlotKey::half_hour(2024, 5, 10, 9, HalfHour::First);

        let first = transfer.begin(&registry, TaskId::new(100)).unwrap();
        transfer.complete(first, Some(&key), &registry, &mut schedule);
        let second = transfer.begin(&registry, TaskId::new(100)).unwrap();

        assert_eq!(
            transfer.complete(second, Some(&key), &registry, &mut schedule),
            DropOutcome::Duplicate
        );
        assert_eq!(schedule.get(&key).len(), 1);
    }

    #[test]
    fn drop_outside_slots_changes_nothing() {
        let (registry, mut schedule, mut transfer) = setup();
        let handle = transfer.begin(&registry, TaskId::new(200)).unwrap();

        assert_eq!(
            transfer.complete(handle, None, &registry, &mut schedule),
            DropOutcome::NoTarget
        );
        assert!(!transfer.is_dragging());
        assert!(schedule.is_empty());
    }

    #[test]
    fn unknown_task_cannot_be_dragged() {
        let (registry, _, mut transfer) = setup();
        assert!(transfer.begin(&registry, TaskId::new(999)).is_none());
        assert!(!transfer.is_dragging());
    }

    #[test]
    fn superseded_handle_is_stale() {
        let (registry, mut schedule, mut transfer) = setup();
        let key = SlotKey::day(2024, 5, 10);
        let old = transfer.begin(&registry, TaskId::new(100)).unwrap();
        let current = transfer.begin(&registry, TaskId::new(200)).unwrap();

        assert_eq!(
            transfer.complete(old, Some(&key), &registry, &mut schedule),
            DropOutcome::NoActiveDrag
        );
        assert!(transfer.is_dragging());

        assert_eq!(
            transfer.complete(current, Some(&key), &registry, &mut schedule),
            DropOutcome::Placed
        );
        assert_eq!(schedule.get(&key)[0].id, TaskId::new(200));
    }

    #[test]
    fn cancelled_drag_cannot_complete() {
        let (registry, mut schedule, mut transfer) = setup();
        let handle = transfer.begin(&registry, TaskId::new(100)).unwrap();
        assert!(transfer.cancel());
        assert!(!transfer.cancel());

        assert_eq!(
            transfer.complete(handle, Some(&SlotKey::day(2024, 1, 1)), &registry, &mut schedule),
            DropOutcome::NoActiveDrag
        );
        assert!(schedule.is_empty());
    }

    #[test]
    fn place_now_leaves_active_drag_alone() {
        let (registry, mut schedule, mut transfer) = setup();
        let key = SlotKey::day(2024, 5, 10);
        let handle = transfer.begin(&registry, TaskId::new(100)).unwrap();

        assert_eq!(
            transfer.place_now(TaskId::new(200), &key, &registry, &mut schedule),
            DropOutcome::Placed
        );
        assert_eq!(
            transfer.place_now(TaskId::new(999), &key, &registry, &mut schedule),
            DropOutcome::TaskMissing
        );
        assert!(transfer.is_dragging());

        assert_eq!(
            transfer.complete(handle, Some(&key), &registry, &mut schedule),
            DropOutcome::Placed
        );
        assert_eq!(schedule.get(&key).len(), 2);
    }

    #[test]
    fn task_removed_mid_drag_is_not_placed() {
        let (mut registry, mut schedule, mut transfer) = setup();
        let handle = transfer.begin(&registry, TaskId::new(100)).unwrap();
        registry.remove(TaskId::new(100));

        assert_eq!(
            transfer.complete(handle, Some(&SlotKey::day(2024, 1, 1)), &registry, &mut schedule),
            DropOutcome::TaskMissing
        );
        assert!(schedule.is_empty());
    }
}

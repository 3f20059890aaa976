//! Domain model for todo tasks and calendar slot addressing.
//!
//! # Responsibility
//! - Define the task record shared by the registry and the schedule.
//! - Define the slot key codec that flattens calendar buckets into one map.
//!
//! # Invariants
//! - Tasks are identified by a stable `TaskId`; text is never blank.
//! - Slot keys of different granularity never encode to the same string.

pub mod slot_key;
pub mod task;

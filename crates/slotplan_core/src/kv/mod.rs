//! Key-value persistence collaborator.
//!
//! # Responsibility
//! - Define the opaque load/save contract the planner persists through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Values are JSON text; backends never interpret them.
//! - `save` replaces the whole value stored under a key.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

/// Storage key for the task registry (JSON array of tasks).
pub const TODOS_KEY: &str = "todos";
/// Storage key for the schedule store (JSON object keyed by slot key).
pub const SCHEDULE_KEY: &str = "scheduledTodos";

pub type KvResult<T> = Result<T, KvError>;

/// Errors raised by persistence backends.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Key was empty after trimming.
    InvalidKey,
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey => write!(f, "storage key must not be blank"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque key-value storage used for durable planner state.
pub trait KvStore {
    /// Returns the stored JSON text, or `None` when the key was never saved.
    fn load(&self, key: &str) -> KvResult<Option<String>>;
    /// Stores JSON text under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> KvResult<()>;
}

fn ensure_key(key: &str) -> KvResult<()> {
    if key.trim().is_empty() {
        return Err(KvError::InvalidKey);
    }
    Ok(())
}

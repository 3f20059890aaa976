//! In-process key-value backend.

use super::{ensure_key, KvResult, KvStore};
use std::collections::HashMap;

/// Volatile store; contents are lost when the value is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn load(&self, key: &str) -> KvResult<Option<String>> {
        ensure_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> KvResult<()> {
        ensure_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvStore;
    use crate::kv::{KvError, KvStore};

    #[test]
    fn save_replaces_previous_value() {
        let mut store = MemoryKvStore::new();
        assert_eq!(store.load("todos").unwrap(), None);

        store.save("todos", "[]").unwrap();
        store.save("todos", "[1]").unwrap();

        assert_eq!(store.load("todos").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn blank_key_is_rejected() {
        let mut store = MemoryKvStore::new();
        assert!(matches!(store.save("  ", "{}"), Err(KvError::InvalidKey)));
        assert!(store.is_empty());
    }
}

//! SQLite-backed key-value backend.
//!
//! # Invariants
//! - The connection must come from `db::open_db*` (schema at latest version).
//! - Each `save` is a single upsert statement.

use super::{ensure_key, KvResult, KvStore};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store persisted in the `kv_entries` table.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `DbError::UninitializedConnection` when the schema version does not
    ///   match this build.
    pub fn try_new(conn: Connection) -> KvResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(&conn)?;
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            }
            .into());
        }
        Ok(Self { conn })
    }

    /// Returns the underlying connection.
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn load(&self, key: &str) -> KvResult<Option<String>> {
        ensure_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> KvResult<()> {
        ensure_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=kv_save module=kv status=ok key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::db::{open_db_in_memory, DbError};
    use crate::kv::{KvError, KvStore};
    use rusqlite::Connection;

    #[test]
    fn load_missing_key_returns_none() {
        let store = SqliteKvStore::try_new(open_db_in_memory().unwrap()).unwrap();
        assert_eq!(store.load("todos").unwrap(), None);
    }

    #[test]
    fn save_upserts() {
        let mut store = SqliteKvStore::try_new(open_db_in_memory().unwrap()).unwrap();
        store.save("scheduledTodos", "{}").unwrap();
        store.save("scheduledTodos", r#"{"2024-5-10":[]}"#).unwrap();

        assert_eq!(
            store.load("scheduledTodos").unwrap().as_deref(),
            Some(r#"{"2024-5-10":[]}"#)
        );
        let rows: i64 = store
            .into_inner()
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKvStore::try_new(conn).err().unwrap();
        assert!(matches!(
            err,
            KvError::Db(DbError::UninitializedConnection {
                actual_version: 0,
                ..
            })
        ));
    }
}

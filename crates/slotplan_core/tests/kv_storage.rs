use rusqlite::Connection;
use slotplan_core::db::migrations::latest_version;
use slotplan_core::db::{open_db, open_db_in_memory, DbError};
use slotplan_core::{KvError, KvStore, SqliteKvStore, TODOS_KEY};

#[test]
fn open_db_in_memory_creates_kv_table() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn reopening_file_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slotplan.sqlite3");

    let mut store = SqliteKvStore::try_new(open_db(&path).unwrap()).unwrap();
    store.save(TODOS_KEY, "[]").unwrap();
    store.save(TODOS_KEY, "[1]").unwrap();
    drop(store);

    let store = SqliteKvStore::try_new(open_db(&path).unwrap()).unwrap();
    assert_eq!(store.load(TODOS_KEY).unwrap().as_deref(), Some("[1]"));
    assert_eq!(store.load("missing").unwrap(), None);
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn raw_connection_is_not_accepted() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteKvStore::try_new(conn) {
        Err(KvError::Db(DbError::UninitializedConnection { actual_version, .. })) => {
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("raw connection was accepted"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

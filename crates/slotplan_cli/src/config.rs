//! Runtime configuration for the CLI.
//!
//! # Responsibility
//! - Resolve the database path from flag, environment, or platform default.
//!
//! # Invariants
//! - Resolution never fails; the temp directory is the last fallback.

use std::ffi::OsString;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "SLOTPLAN_DB_PATH";
const APP_DIR_NAME: &str = "slotplan";
const DB_FILE_NAME: &str = "slotplan.sqlite3";

/// Picks the database file.
///
/// Order: `--db-path`, then `SLOTPLAN_DB_PATH`, then
/// `<data dir>/slotplan/slotplan.sqlite3`, then the temp directory.
pub fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    resolve_db_path_with(flag, std::env::var_os(DB_PATH_ENV), dirs::data_dir())
}

fn resolve_db_path_with(
    flag: Option<PathBuf>,
    env: Option<OsString>,
    data_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Some(value) = env.filter(|value| !value.is_empty()) {
        return PathBuf::from(value);
    }
    data_dir
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(DB_FILE_NAME)
}

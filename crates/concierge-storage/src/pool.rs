//! The single serialized SQLite connection plus its pragmas.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use concierge_core::errors::{ConciergeResult, StorageError};

use crate::to_storage_err;

/// One connection behind a mutex. SQLite serializes writers anyway and the
/// query volume here is a handful of statements per request.
pub struct DbConnection {
    conn: Mutex<Connection>,
    in_memory: bool,
}

impl DbConnection {
    pub fn open(path: &Path, busy_timeout_ms: u32) -> ConciergeResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms, true)?;
        Ok(Self {
            conn: Mutex::new(conn),
            in_memory: false,
        })
    }

    pub fn open_in_memory() -> ConciergeResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, 0, false)?;
        Ok(Self {
            conn: Mutex::new(conn),
            in_memory: true,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> ConciergeResult<T>
    where
        F: FnOnce(&Connection) -> ConciergeResult<T>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::Unavailable {
            reason: "connection mutex poisoned".to_string(),
        })?;
        f(&guard)
    }
}

/// WAL only applies to file-backed databases.
fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32, wal: bool) -> ConciergeResult<()> {
    if wal {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    conn.execute_batch(&format!(
        "
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA cache_size = -16000;
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

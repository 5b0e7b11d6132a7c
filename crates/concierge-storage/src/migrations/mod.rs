//! Forward-only schema migrations tracked through `PRAGMA user_version`.

mod v001_records;
mod v002_document_chunks;

use rusqlite::Connection;
use tracing::info;

use concierge_core::errors::{ConciergeResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> ConciergeResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_records::migrate),
    (2, v002_document_chunks::migrate),
];

pub const LATEST_VERSION: u32 = 2;

pub fn current_version(conn: &Connection) -> ConciergeResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the stored version, each in its own
/// transaction.
pub fn run_migrations(conn: &Connection) -> ConciergeResult<u32> {
    let mut version = current_version(conn)?;
    let start = version;
    for (target, migrate) in MIGRATIONS.iter().filter(move |(v, _)| *v > start) {
        conn.execute_batch("BEGIN")
            .map_err(|e| to_storage_err(e.to_string()))?;
        let applied = migrate(conn).and_then(|()| {
            conn.pragma_update(None, "user_version", target)
                .map_err(|e| to_storage_err(e.to_string()))
        });
        if let Err(e) = applied {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(StorageError::MigrationFailed {
                version: *target,
                reason: e.to_string(),
            }
            .into());
        }
        conn.execute_batch("COMMIT")
            .map_err(|e| to_storage_err(e.to_string()))?;
        version = *target;
        info!(version, "applied schema migration");
    }
    Ok(version)
}

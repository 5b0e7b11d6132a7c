//! v001: the records table shared by every structured collection.

use rusqlite::Connection;

use concierge_core::errors::ConciergeResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ConciergeResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS records (
            collection  TEXT NOT NULL,
            id          TEXT NOT NULL,
            owner_id    TEXT,
            parent_id   TEXT,
            status      TEXT,
            kind        TEXT,
            amount      REAL,
            created_at  TEXT NOT NULL,
            body        TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_records_owner ON records(collection, owner_id);
        CREATE INDEX IF NOT EXISTS idx_records_parent ON records(collection, parent_id);
        CREATE INDEX IF NOT EXISTS idx_records_status ON records(collection, status);
        CREATE INDEX IF NOT EXISTS idx_records_created ON records(collection, created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

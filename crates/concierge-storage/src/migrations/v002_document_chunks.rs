//! v002: embedded document chunks, one row per (collection, chunk id).

use rusqlite::Connection;

use concierge_core::errors::ConciergeResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ConciergeResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS document_chunks (
            collection    TEXT NOT NULL,
            id            TEXT NOT NULL,
            text          TEXT NOT NULL,
            document_id   TEXT NOT NULL,
            source        TEXT NOT NULL,
            section       TEXT NOT NULL DEFAULT '',
            chunk_index   INTEGER NOT NULL,
            total_chunks  INTEGER NOT NULL,
            embedding     BLOB NOT NULL,
            dimensions    INTEGER NOT NULL,
            indexed_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_document ON document_chunks(document_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

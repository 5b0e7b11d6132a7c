//! StorageEngine: owns the connection, runs migrations, implements
//! IStructuredStore, and hands out document indexes sharing the connection.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use concierge_core::config::StorageConfig;
use concierge_core::errors::ConciergeResult;
use concierge_core::models::{Collection, Page, Record, RecordFilter};
use concierge_core::traits::{IEmbeddingProvider, IStructuredStore};

use crate::document_index::SqliteDocumentIndex;
use crate::migrations;
use crate::pool::DbConnection;
use crate::queries::record_ops;
use crate::to_storage_err;

/// Cheap to clone; clones share the connection.
#[derive(Clone)]
pub struct StorageEngine {
    db: Arc<DbConnection>,
}

impl StorageEngine {
    /// Open a file-backed store.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> ConciergeResult<Self> {
        Self::initialize(DbConnection::open(path, busy_timeout_ms)?)
    }

    /// Open an in-memory store (tests, demos).
    pub fn open_in_memory() -> ConciergeResult<Self> {
        Self::initialize(DbConnection::open_in_memory()?)
    }

    /// File-backed when `db_path` is set, in-memory otherwise.
    pub fn from_config(config: &StorageConfig) -> ConciergeResult<Self> {
        match config.db_path.as_deref() {
            Some(path) => Self::open(Path::new(path), config.busy_timeout_ms),
            None => Self::open_in_memory(),
        }
    }

    fn initialize(db: DbConnection) -> ConciergeResult<Self> {
        let version = db.with_conn(migrations::run_migrations)?;
        info!(
            schema_version = version,
            in_memory = db.is_in_memory(),
            "StorageEngine initialized"
        );
        Ok(Self { db: Arc::new(db) })
    }

    /// A chunk index over the same database, embedding with `embedder`.
    pub fn document_index(&self, embedder: Arc<dyn IEmbeddingProvider>) -> SqliteDocumentIndex {
        SqliteDocumentIndex::new(self.db.clone(), embedder)
    }

    /// Bulk insert inside a single transaction.
    pub fn upsert_many(&self, records: &[Record]) -> ConciergeResult<usize> {
        self.db.with_conn(|conn| {
            conn.execute_batch("BEGIN")
                .map_err(|e| to_storage_err(e.to_string()))?;
            for record in records {
                if let Err(e) = record_ops::upsert_record(conn, record) {
                    let _ = conn.execute_batch("ROLLBACK");
                    return Err(e);
                }
            }
            conn.execute_batch("COMMIT")
                .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(records.len())
        })
    }

    pub fn schema_version(&self) -> ConciergeResult<u32> {
        self.db.with_conn(migrations::current_version)
    }
}

impl IStructuredStore for StorageEngine {
    fn get(&self, collection: Collection, id: &str) -> ConciergeResult<Option<Record>> {
        self.db
            .with_conn(|conn| record_ops::get_record(conn, collection, id))
    }

    fn query(
        &self,
        collection: Collection,
        filter: &RecordFilter,
        page: Page,
    ) -> ConciergeResult<Vec<Record>> {
        self.db
            .with_conn(|conn| record_ops::query_records(conn, collection, filter, page))
    }

    fn count(&self, collection: Collection, filter: &RecordFilter) -> ConciergeResult<u64> {
        self.db
            .with_conn(|conn| record_ops::count_records(conn, collection, filter))
    }

    fn sum_amount(&self, collection: Collection, filter: &RecordFilter) -> ConciergeResult<f64> {
        self.db
            .with_conn(|conn| record_ops::sum_amount(conn, collection, filter))
    }

    fn count_by_parent(
        &self,
        collection: Collection,
        filter: &RecordFilter,
        limit: usize,
    ) -> ConciergeResult<Vec<(String, u64)>> {
        self.db
            .with_conn(|conn| record_ops::count_by_parent(conn, collection, filter, limit))
    }

    fn upsert(&self, record: &Record) -> ConciergeResult<()> {
        self.db
            .with_conn(|conn| record_ops::upsert_record(conn, record))
    }

    fn ping(&self) -> ConciergeResult<()> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))
                .map_err(|e| to_storage_err(e.to_string()))
        })
    }
}

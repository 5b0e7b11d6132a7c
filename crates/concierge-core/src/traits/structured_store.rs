use crate::errors::ConciergeResult;
use crate::models::{Collection, Page, Record, RecordFilter};

/// External structured store. All reads are scoped through `RecordFilter`.
pub trait IStructuredStore: Send + Sync {
    /// Point lookup by id.
    fn get(&self, collection: Collection, id: &str) -> ConciergeResult<Option<Record>>;

    /// Filtered, paginated query.
    fn query(
        &self,
        collection: Collection,
        filter: &RecordFilter,
        page: Page,
    ) -> ConciergeResult<Vec<Record>>;

    /// Number of records matching `filter`.
    fn count(&self, collection: Collection, filter: &RecordFilter) -> ConciergeResult<u64>;

    /// Sum of `amount` over records matching `filter`. Records without an
    /// amount contribute nothing.
    fn sum_amount(&self, collection: Collection, filter: &RecordFilter) -> ConciergeResult<f64>;

    /// Counts grouped by `parent_id`, largest first, at most `limit` groups.
    fn count_by_parent(
        &self,
        collection: Collection,
        filter: &RecordFilter,
        limit: usize,
    ) -> ConciergeResult<Vec<(String, u64)>>;

    /// Insert or replace a record.
    fn upsert(&self, record: &Record) -> ConciergeResult<()>;

    /// Cheap reachability check used by health reporting.
    fn ping(&self) -> ConciergeResult<()>;
}

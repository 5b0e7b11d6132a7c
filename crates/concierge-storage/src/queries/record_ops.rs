//! Record CRUD and aggregates. Every read goes through a `RecordFilter`,
//! compiled into a parameterized WHERE clause.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use concierge_core::errors::{ConciergeResult, StorageError};
use concierge_core::models::{Collection, Page, Record, RecordFilter, SortOrder};

use crate::to_storage_err;

const RECORD_COLUMNS: &str =
    "collection, id, owner_id, parent_id, status, kind, amount, created_at, body";

/// Fixed-width RFC 3339 so that lexical order equals chronological order.
pub fn encode_time(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(raw: &str) -> ConciergeResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::Serialization {
                reason: format!("bad created_at '{raw}': {e}"),
            }
            .into()
        })
}

fn decode_collection(raw: &str) -> ConciergeResult<Collection> {
    Collection::ALL
        .into_iter()
        .find(|c| c.as_str() == raw)
        .ok_or_else(|| {
            StorageError::Serialization {
                reason: format!("unknown collection '{raw}'"),
            }
            .into()
        })
}

/// Raw column values, decoded outside the rusqlite row closure so decode
/// errors keep their own type.
struct RawRecord {
    collection: String,
    id: String,
    owner_id: Option<String>,
    parent_id: Option<String>,
    status: Option<String>,
    kind: Option<String>,
    amount: Option<f64>,
    created_at: String,
    body: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            collection: row.get(0)?,
            id: row.get(1)?,
            owner_id: row.get(2)?,
            parent_id: row.get(3)?,
            status: row.get(4)?,
            kind: row.get(5)?,
            amount: row.get(6)?,
            created_at: row.get(7)?,
            body: row.get(8)?,
        })
    }

    fn decode(self) -> ConciergeResult<Record> {
        Ok(Record {
            collection: decode_collection(&self.collection)?,
            id: self.id,
            owner_id: self.owner_id,
            parent_id: self.parent_id,
            status: self.status,
            kind: self.kind,
            amount: self.amount,
            created_at: decode_time(&self.created_at)?,
            body: serde_json::from_str(&self.body)?,
        })
    }
}

/// WHERE clause and its bound values for `collection` + `filter`.
fn where_clause(collection: Collection, filter: &RecordFilter) -> (String, Vec<Value>) {
    let mut clauses = vec!["collection = ?".to_string()];
    let mut values = vec![Value::Text(collection.as_str().to_string())];

    let equalities = [
        ("owner_id", &filter.owner_id),
        ("parent_id", &filter.parent_id),
        ("status", &filter.status),
        ("kind", &filter.kind),
    ];
    for (column, wanted) in equalities {
        if let Some(v) = wanted {
            clauses.push(format!("{column} = ?"));
            values.push(Value::Text(v.clone()));
        }
    }
    if let Some(from) = &filter.created_from {
        clauses.push("created_at >= ?".to_string());
        values.push(Value::Text(encode_time(from)));
    }
    if let Some(to) = &filter.created_to {
        clauses.push("created_at < ?".to_string());
        values.push(Value::Text(encode_time(to)));
    }
    (clauses.join(" AND "), values)
}

pub fn upsert_record(conn: &Connection, record: &Record) -> ConciergeResult<()> {
    let body = serde_json::to_string(&record.body)?;
    conn.execute(
        "INSERT INTO records (collection, id, owner_id, parent_id, status, kind, amount, created_at, body)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(collection, id) DO UPDATE SET
            owner_id = excluded.owner_id,
            parent_id = excluded.parent_id,
            status = excluded.status,
            kind = excluded.kind,
            amount = excluded.amount,
            created_at = excluded.created_at,
            body = excluded.body",
        params![
            record.collection.as_str(),
            record.id,
            record.owner_id,
            record.parent_id,
            record.status,
            record.kind,
            record.amount,
            encode_time(&record.created_at),
            body,
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert {}/{}: {e}", record.collection, record.id)))?;
    Ok(())
}

pub fn get_record(
    conn: &Connection,
    collection: Collection,
    id: &str,
) -> ConciergeResult<Option<Record>> {
    let raw = conn
        .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE collection = ?1 AND id = ?2"),
            params![collection.as_str(), id],
            RawRecord::from_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(RawRecord::decode).transpose()
}

pub fn query_records(
    conn: &Connection,
    collection: Collection,
    filter: &RecordFilter,
    page: Page,
) -> ConciergeResult<Vec<Record>> {
    let (clause, mut values) = where_clause(collection, filter);
    let order = match page.order {
        SortOrder::NewestFirst => "created_at DESC, id ASC",
        SortOrder::AmountDesc => "COALESCE(amount, 0) DESC, created_at DESC",
    };
    values.push(Value::Integer(page.limit as i64));
    values.push(Value::Integer(page.offset as i64));

    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM records WHERE {clause} ORDER BY {order} LIMIT ? OFFSET ?"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(values), RawRecord::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        records.push(raw.decode()?);
    }
    Ok(records)
}

pub fn count_records(
    conn: &Connection,
    collection: Collection,
    filter: &RecordFilter,
) -> ConciergeResult<u64> {
    let (clause, values) = where_clause(collection, filter);
    let count: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM records WHERE {clause}"),
            params_from_iter(values),
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as u64)
}

pub fn sum_amount(
    conn: &Connection,
    collection: Collection,
    filter: &RecordFilter,
) -> ConciergeResult<f64> {
    let (clause, values) = where_clause(collection, filter);
    let total: f64 = conn
        .query_row(
            &format!("SELECT COALESCE(SUM(amount), 0.0) FROM records WHERE {clause}"),
            params_from_iter(values),
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(total)
}

pub fn count_by_parent(
    conn: &Connection,
    collection: Collection,
    filter: &RecordFilter,
    limit: usize,
) -> ConciergeResult<Vec<(String, u64)>> {
    let (clause, mut values) = where_clause(collection, filter);
    values.push(Value::Integer(limit as i64));
    let sql = format!(
        "SELECT parent_id, COUNT(*) AS n FROM records
         WHERE {clause} AND parent_id IS NOT NULL
         GROUP BY parent_id ORDER BY n DESC, parent_id ASC LIMIT ?"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(values), |row| {
            let parent: String = row.get(0)?;
            let n: i64 = row.get(1)?;
            Ok((parent, n.max(0) as u64))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encoded_times_sort_lexically() {
        let a = Utc.with_ymd_and_hms(2026, 1, 9, 23, 59, 59).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        assert!(encode_time(&a) < encode_time(&b));
        assert_eq!(decode_time(&encode_time(&a)).unwrap(), a);
    }

    #[test]
    fn where_clause_binds_only_present_fields() {
        let filter = RecordFilter::new().owner("p1").status("pending");
        let (clause, values) = where_clause(Collection::Listings, &filter);
        assert_eq!(clause, "collection = ? AND owner_id = ? AND status = ?");
        assert_eq!(values.len(), 3);
    }
}

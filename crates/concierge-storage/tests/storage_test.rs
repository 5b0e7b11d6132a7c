//! StorageEngine and SqliteDocumentIndex against real SQLite.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use concierge_core::errors::{ConciergeResult, EmbeddingError};
use concierge_core::models::{
    Collection, DocumentCategory, DocumentChunk, DocumentMetadata, Page, Record, RecordFilter,
    SortOrder,
};
use concierge_core::traits::{IDocumentIndex, IEmbeddingProvider, IStructuredStore};
use concierge_embeddings::TfIdfFallback;
use concierge_storage::StorageEngine;
use proptest::prelude::*;

fn seeded() -> StorageEngine {
    let store = StorageEngine::open_in_memory().unwrap();
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let records = vec![
        Record::new(Collection::Listings, "l1").owner("p1").status("active").created_at(base),
        Record::new(Collection::Listings, "l2").owner("p1").status("pending").created_at(base),
        Record::new(Collection::Listings, "l3").owner("p2").status("active").created_at(base),
        Record::new(Collection::AnalyticsEvents, "e1").owner("p1").parent("l1").kind("view").created_at(base),
        Record::new(Collection::AnalyticsEvents, "e2").owner("p1").parent("l1").kind("view").created_at(base + Duration::days(1)),
        Record::new(Collection::AnalyticsEvents, "e3").owner("p1").parent("l2").kind("click").created_at(base + Duration::days(2)),
        Record::new(Collection::AnalyticsEvents, "e4").owner("p2").parent("l3").kind("view").created_at(base),
        Record::new(Collection::Bookings, "b1").owner("p1").parent("l1").status("confirmed").amount(120.0).created_at(base),
        Record::new(Collection::Bookings, "b2").owner("p1").parent("l2").status("confirmed").amount(80.5).created_at(base + Duration::days(3)),
        Record::new(Collection::Bookings, "b3").owner("p1").parent("l2").status("cancelled").amount(999.0).created_at(base),
    ];
    store.upsert_many(&records).unwrap();
    store
}

#[test]
fn migrations_reach_latest_version() {
    let store = StorageEngine::open_in_memory().unwrap();
    assert_eq!(
        store.schema_version().unwrap(),
        concierge_storage::migrations::LATEST_VERSION
    );
    store.ping().unwrap();
}

#[test]
fn get_round_trips_body() {
    let store = StorageEngine::open_in_memory().unwrap();
    let record = Record::new(Collection::Users, "u1")
        .body(serde_json::json!({"name": "Asha", "role": "consumer"}));
    store.upsert(&record).unwrap();
    let loaded = store.get(Collection::Users, "u1").unwrap().unwrap();
    assert_eq!(loaded.body["name"], "Asha");
    assert!(store.get(Collection::Listings, "u1").unwrap().is_none());
}

#[test]
fn upsert_replaces_existing_row() {
    let store = seeded();
    let updated = Record::new(Collection::Listings, "l2").owner("p1").status("active");
    store.upsert(&updated).unwrap();
    let active = RecordFilter::new().owner("p1").status("active");
    assert_eq!(store.count(Collection::Listings, &active).unwrap(), 2);
}

#[test]
fn filters_scope_to_owner() {
    let store = seeded();
    let p1 = RecordFilter::new().owner("p1");
    assert_eq!(store.count(Collection::AnalyticsEvents, &p1).unwrap(), 3);
    let rows = store
        .query(Collection::AnalyticsEvents, &p1, Page::first(10))
        .unwrap();
    assert!(rows.iter().all(|r| r.owner_id.as_deref() == Some("p1")));
    assert_eq!(rows[0].id, "e3", "newest first");
}

#[test]
fn time_window_is_half_open() {
    let store = seeded();
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let window = RecordFilter::new()
        .owner("p1")
        .between(base, base + Duration::days(2));
    assert_eq!(store.count(Collection::AnalyticsEvents, &window).unwrap(), 2);
}

#[test]
fn sum_ignores_filtered_out_rows() {
    let store = seeded();
    let confirmed = RecordFilter::new().owner("p1").status("confirmed");
    let total = store.sum_amount(Collection::Bookings, &confirmed).unwrap();
    assert!((total - 200.5).abs() < 1e-9);
    let nobody = RecordFilter::new().owner("nobody");
    assert_eq!(store.sum_amount(Collection::Bookings, &nobody).unwrap(), 0.0);
}

#[test]
fn count_by_parent_orders_largest_first() {
    let store = seeded();
    let views = RecordFilter::new().owner("p1");
    let groups = store
        .count_by_parent(Collection::AnalyticsEvents, &views, 10)
        .unwrap();
    assert_eq!(groups, vec![("l1".to_string(), 2), ("l2".to_string(), 1)]);
    let top1 = store
        .count_by_parent(Collection::AnalyticsEvents, &views, 1)
        .unwrap();
    assert_eq!(top1.len(), 1);
}

#[test]
fn amount_order_and_pagination() {
    let store = seeded();
    let page = Page::first(2).ordered(SortOrder::AmountDesc);
    let rows = store
        .query(Collection::Bookings, &RecordFilter::new(), page)
        .unwrap();
    assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["b3", "b1"]);
    let next = store
        .query(Collection::Bookings, &RecordFilter::new(), page.offset(2))
        .unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].id, "b2");
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concierge.db");
    {
        let store = StorageEngine::open(&path, 1000).unwrap();
        store.upsert(&Record::new(Collection::SavedItems, "s1").owner("u1")).unwrap();
    }
    let reopened = StorageEngine::open(&path, 1000).unwrap();
    let mine = RecordFilter::new().owner("u1");
    assert_eq!(reopened.count(Collection::SavedItems, &mine).unwrap(), 1);
}

fn metadata(doc: &str, source: &str, i: usize) -> DocumentMetadata {
    DocumentMetadata {
        document_id: doc.to_string(),
        source: source.to_string(),
        section: "general".to_string(),
        chunk_index: i,
        total_chunks: 2,
    }
}

#[test]
fn document_index_ranks_relevant_chunks_first() {
    let store = StorageEngine::open_in_memory().unwrap();
    let index = store.document_index(Arc::new(TfIdfFallback::new(384)));
    index
        .add(
            DocumentCategory::Policy,
            "refund_chunk_0",
            "Refund policy: bookings cancelled within 48 hours receive a full refund.",
            &metadata("refund", "Refund Policy", 0),
        )
        .unwrap();
    index
        .add(
            DocumentCategory::Policy,
            "privacy_chunk_0",
            "We process personal data in line with PDPA requirements.",
            &metadata("privacy", "Privacy Policy", 0),
        )
        .unwrap();
    index
        .add(
            DocumentCategory::Help,
            "upload_chunk_0",
            "To upload photos open your listing and choose Add photos.",
            &metadata("upload", "Uploading Photos", 0),
        )
        .unwrap();

    assert_eq!(index.count(DocumentCategory::Policy).unwrap(), 2);
    assert_eq!(index.count(DocumentCategory::Help).unwrap(), 1);

    let hits = index
        .similarity_search(DocumentCategory::Policy, "what is the refund policy for cancelled bookings", 5)
        .unwrap();
    assert_eq!(hits[0].id, "refund_chunk_0");
    assert_eq!(hits[0].metadata.source, "Refund Policy");
    assert!(hits.iter().all(|h| (0.0..=1.0).contains(&h.score)));
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(hits.iter().all(|h| h.id != "upload_chunk_0"), "collections are isolated");
}

#[test]
fn re_adding_a_chunk_replaces_it() {
    let store = StorageEngine::open_in_memory().unwrap();
    let index = store.document_index(Arc::new(TfIdfFallback::new(64)));
    let meta = metadata("d", "Doc", 0);
    index.add(DocumentCategory::Help, "d_chunk_0", "first text", &meta).unwrap();
    index.add(DocumentCategory::Help, "d_chunk_0", "second text", &meta).unwrap();
    assert_eq!(index.count(DocumentCategory::Help).unwrap(), 1);
}

fn chunks(doc: &str, texts: &[&str]) -> Vec<DocumentChunk> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| DocumentChunk {
            id: format!("{doc}_chunk_{i}"),
            text: text.to_string(),
            metadata: DocumentMetadata {
                document_id: doc.to_string(),
                source: doc.to_string(),
                section: "general".to_string(),
                chunk_index: i,
                total_chunks: texts.len(),
            },
        })
        .collect()
}

#[test]
fn replace_document_removes_chunks_past_the_new_length() {
    let store = StorageEngine::open_in_memory().unwrap();
    let index = store.document_index(Arc::new(TfIdfFallback::new(64)));

    let first = chunks("refunds", &["free cancellation", "deposit kept", "full refund within 48 hours"]);
    assert_eq!(index.replace_document(DocumentCategory::Policy, "refunds", &first).unwrap(), 3);
    index
        .replace_document(DocumentCategory::Policy, "pets", &chunks("pets", &["pets allowed"]))
        .unwrap();

    let second = chunks("refunds", &["Refunds are no longer offered."]);
    assert_eq!(index.replace_document(DocumentCategory::Policy, "refunds", &second).unwrap(), 1);

    assert_eq!(index.count(DocumentCategory::Policy).unwrap(), 2);
    let hits = index
        .similarity_search(DocumentCategory::Policy, "full refund within 48 hours", 10)
        .unwrap();
    assert!(hits.iter().all(|h| h.id != "refunds_chunk_2"));
}

/// Fails on any text mentioning "poison", TF-IDF otherwise.
struct PickyEmbedder(TfIdfFallback);

impl IEmbeddingProvider for PickyEmbedder {
    fn embed(&self, text: &str) -> ConciergeResult<Vec<f32>> {
        if text.contains("poison") {
            return Err(EmbeddingError::InferenceFailed {
                reason: "rejected".to_string(),
            }
            .into());
        }
        self.0.embed(text)
    }
    fn dimensions(&self) -> usize {
        self.0.dimensions()
    }
    fn name(&self) -> &str {
        "picky"
    }
    fn is_available(&self) -> bool {
        true
    }
}

#[test]
fn failed_replace_keeps_the_previous_version() {
    let store = StorageEngine::open_in_memory().unwrap();
    let index = store.document_index(Arc::new(PickyEmbedder(TfIdfFallback::new(64))));

    let original = chunks("guide", &["step one", "step two"]);
    index.replace_document(DocumentCategory::Help, "guide", &original).unwrap();

    let broken = chunks("guide", &["new step one", "poison pill"]);
    assert!(index.replace_document(DocumentCategory::Help, "guide", &broken).is_err());

    assert_eq!(index.count(DocumentCategory::Help).unwrap(), 2);
    let hits = index.similarity_search(DocumentCategory::Help, "step two", 5).unwrap();
    assert_eq!(hits[0].id, "guide_chunk_1");
    assert_eq!(hits[0].text, "step two");
}

proptest! {
    #[test]
    fn count_matches_in_memory_filter(owners in proptest::collection::vec(0u8..4, 0..30)) {
        let store = StorageEngine::open_in_memory().unwrap();
        let records: Vec<Record> = owners
            .iter()
            .enumerate()
            .map(|(i, o)| Record::new(Collection::SavedItems, format!("s{i}")).owner(format!("u{o}")))
            .collect();
        store.upsert_many(&records).unwrap();
        for o in 0..4u8 {
            let filter = RecordFilter::new().owner(format!("u{o}"));
            let expected = records.iter().filter(|r| filter.matches(r)).count() as u64;
            prop_assert_eq!(store.count(Collection::SavedItems, &filter).unwrap(), expected);
        }
    }
}

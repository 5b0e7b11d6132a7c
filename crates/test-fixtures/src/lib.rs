//! Test fixture loader for Concierge golden datasets, plus scripted
//! collaborators (generation backends, stores, embedders) for pipeline tests.

pub mod mocks;

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use concierge_core::models::{Collection, DocumentCategory, Record};
use concierge_core::{ClassificationMethod, Intent};

/// Root directory of the golden files.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// A labelled query for classifier and pipeline tests.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentCase {
    pub query: String,
    pub expected_intent: Intent,
    pub expected_method: ClassificationMethod,
}

pub fn intent_cases() -> Vec<IntentCase> {
    load_fixture("intent_queries.json")
}

/// A seed record whose timestamp is relative to the moment of loading, so
/// time-window tests stay valid whenever they run.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    pub collection: Collection,
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub days_ago: i64,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl SeedRecord {
    pub fn to_record(&self, now: DateTime<Utc>) -> Record {
        Record {
            id: self.id.clone(),
            collection: self.collection,
            owner_id: self.owner_id.clone(),
            parent_id: self.parent_id.clone(),
            status: self.status.clone(),
            kind: self.kind.clone(),
            amount: self.amount,
            created_at: now - Duration::days(self.days_ago) - Duration::minutes(1),
            body: match &self.body {
                serde_json::Value::Null => serde_json::json!({}),
                other => other.clone(),
            },
        }
    }
}

/// Seed records materialized against `now`.
pub fn seed_records(now: DateTime<Utc>) -> Vec<Record> {
    let seeds: Vec<SeedRecord> = load_fixture("seed_records.json");
    seeds.iter().map(|s| s.to_record(now)).collect()
}

/// A document to ingest into the chunk index.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentFixture {
    pub category: DocumentCategory,
    pub id: String,
    pub title: String,
    pub section: String,
    pub text: String,
}

pub fn documents() -> Vec<DocumentFixture> {
    load_fixture("documents.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_files_parse() {
        assert!(!intent_cases().is_empty());
        assert!(!seed_records(Utc::now()).is_empty());
        assert!(!documents().is_empty());
    }

    #[test]
    fn seed_timestamps_are_in_the_past() {
        let now = Utc::now();
        assert!(seed_records(now).iter().all(|r| r.created_at < now));
    }
}

//! Scripted collaborators. Each one does exactly what it is told and counts
//! how often it was asked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use concierge_core::errors::{ConciergeResult, EmbeddingError, GenerationError, StorageError};
use concierge_core::models::{
    Collection, DocumentCategory, DocumentChunk, DocumentHit, DocumentMetadata, GenerationRequest,
    Page, Record, RecordFilter, TelemetryEvent,
};
use concierge_core::traits::{
    IDocumentIndex, IEmbeddingProvider, IGenerationBackend, IStructuredStore, ITelemetrySink,
};

/// What a [`ScriptedBackend`] does on every call.
#[derive(Debug, Clone)]
pub enum Script {
    /// Return this text.
    Reply(String),
    /// Echo the prompt back, prefixed with the backend name.
    Echo,
    Fail,
    /// Sleep far longer than any test timeout.
    Hang,
    /// Report unavailable; never expects a call.
    Offline,
}

pub struct ScriptedBackend {
    name: String,
    script: Script,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new(name: &str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn reply(name: &str, text: &str) -> Arc<Self> {
        Self::new(name, Script::Reply(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl IGenerationBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Echo => Ok(format!("[{}] {}", self.name, request.prompt)),
            Script::Fail | Script::Offline => Err(GenerationError::RequestFailed {
                backend: self.name.clone(),
                reason: "scripted failure with internal detail".to_string(),
            }),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(600)).await;
                Ok(String::new())
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        !matches!(self.script, Script::Offline)
    }
}

/// Structured store whose every call fails with an internal-looking error.
#[derive(Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> ConciergeResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Sqlite {
            message: "disk I/O error at /var/lib/concierge/records.db".to_string(),
        }
        .into())
    }
}

impl IStructuredStore for FailingStore {
    fn get(&self, _c: Collection, _id: &str) -> ConciergeResult<Option<Record>> {
        self.fail()
    }
    fn query(&self, _c: Collection, _f: &RecordFilter, _p: Page) -> ConciergeResult<Vec<Record>> {
        self.fail()
    }
    fn count(&self, _c: Collection, _f: &RecordFilter) -> ConciergeResult<u64> {
        self.fail()
    }
    fn sum_amount(&self, _c: Collection, _f: &RecordFilter) -> ConciergeResult<f64> {
        self.fail()
    }
    fn count_by_parent(
        &self,
        _c: Collection,
        _f: &RecordFilter,
        _limit: usize,
    ) -> ConciergeResult<Vec<(String, u64)>> {
        self.fail()
    }
    fn upsert(&self, _r: &Record) -> ConciergeResult<()> {
        self.fail()
    }
    fn ping(&self) -> ConciergeResult<()> {
        self.fail()
    }
}

/// Document index that returns fixed hits regardless of the query, and
/// counts searches.
#[derive(Default)]
pub struct FixedIndex {
    hits: Vec<(DocumentCategory, DocumentHit)>,
    searches: AtomicUsize,
}

impl FixedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(mut self, category: DocumentCategory, id: &str, text: &str, score: f64) -> Self {
        self.hits.push((
            category,
            DocumentHit {
                id: id.to_string(),
                text: text.to_string(),
                metadata: DocumentMetadata {
                    document_id: id.to_string(),
                    source: format!("{id} guide"),
                    section: "general".to_string(),
                    chunk_index: 0,
                    total_chunks: 1,
                },
                score,
            },
        ));
        self
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

impl IDocumentIndex for FixedIndex {
    fn similarity_search(
        &self,
        category: DocumentCategory,
        _query: &str,
        k: usize,
    ) -> ConciergeResult<Vec<DocumentHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let mut hits: Vec<DocumentHit> = self
            .hits
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, h)| h.clone())
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }

    fn add(
        &self,
        _category: DocumentCategory,
        _id: &str,
        _text: &str,
        _metadata: &DocumentMetadata,
    ) -> ConciergeResult<()> {
        Ok(())
    }

    fn replace_document(
        &self,
        _category: DocumentCategory,
        _document_id: &str,
        chunks: &[DocumentChunk],
    ) -> ConciergeResult<usize> {
        Ok(chunks.len())
    }

    fn count(&self, category: DocumentCategory) -> ConciergeResult<usize> {
        Ok(self.hits.iter().filter(|(c, _)| *c == category).count())
    }
}

/// Embedding provider that is always down.
pub struct OfflineEmbedder;

impl IEmbeddingProvider for OfflineEmbedder {
    fn embed(&self, _text: &str) -> ConciergeResult<Vec<f32>> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: "offline".to_string(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        384
    }

    fn name(&self) -> &str {
        "offline"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Telemetry sink that keeps every event for inspection.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }
}

impl ITelemetrySink for CollectingSink {
    fn emit(&self, event: &TelemetryEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

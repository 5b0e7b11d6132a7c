//! RetrievalEngine: containment check, threshold filter, cited synthesis.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use concierge_core::config::RetrievalConfig;
use concierge_core::errors::{ConciergeResult, RetrievalError};
use concierge_core::models::{
    Citation, DocumentCategory, DocumentChunk, DocumentMetadata, GenerationRequest,
    RefusalReason, RetrievalOutcome, RetrievedChunk, Role,
};
use concierge_core::traits::IDocumentIndex;
use concierge_core::Intent;
use concierge_generation::GenerationFacade;

use crate::{chunker, prompt};

pub const FORBIDDEN_INTENT_MESSAGE: &str =
    "I cannot provide analytics or revenue data. Please use the analytics dashboard or ask an admin.";

pub const INSUFFICIENT_EVIDENCE_MESSAGE: &str = "I don't have enough information to answer that question accurately. Please contact support or check the help documentation.";

/// Document retrieval with refusal semantics.
pub struct RetrievalEngine {
    index: Arc<dyn IDocumentIndex>,
    generation: Arc<GenerationFacade>,
    config: RetrievalConfig,
    search_timeout: Duration,
}

impl RetrievalEngine {
    pub fn new(
        index: Arc<dyn IDocumentIndex>,
        generation: Arc<GenerationFacade>,
        config: &RetrievalConfig,
    ) -> Self {
        info!(
            threshold = config.similarity_threshold,
            max_chunks = config.max_chunks,
            "RetrievalEngine initialized"
        );
        Self {
            index,
            generation,
            config: config.clone(),
            search_timeout: Duration::from_millis(config.search_timeout_ms),
        }
    }

    /// Answer `query` from documents.
    ///
    /// Refusals are `Ok` values. `Err` means the index itself failed.
    pub async fn query(
        &self,
        query: &str,
        intent: Intent,
        role: Role,
    ) -> ConciergeResult<RetrievalOutcome> {
        if intent.is_structured_only() {
            warn!(intent = %intent, role = %role, "refusing structured-only intent");
            return Ok(RetrievalOutcome::refused(
                RefusalReason::ForbiddenIntent,
                FORBIDDEN_INTENT_MESSAGE,
            ));
        }

        let category = DocumentCategory::for_intent(intent);
        let chunks = self.search(category, query).await?;
        if chunks.is_empty() {
            warn!(
                intent = %intent,
                collection = category.collection_name(),
                threshold = self.config.similarity_threshold,
                "no chunk above threshold, refusing"
            );
            return Ok(RetrievalOutcome::refused(
                RefusalReason::InsufficientEvidence,
                INSUFFICIENT_EVIDENCE_MESSAGE,
            ));
        }

        let context = prompt::build_context(&chunks);
        let request = GenerationRequest::new(
            prompt::synthesis_prompt(intent, query, &context),
            self.config.synthesis_max_tokens,
            self.config.synthesis_temperature,
        )
        .with_system(prompt::SYNTHESIS_SYSTEM_PROMPT);

        let Some(outcome) = self.generation.generate(&request).await else {
            warn!(intent = %intent, chunks = chunks.len(), "synthesis unavailable, refusing");
            return Ok(RetrievalOutcome::refused(
                RefusalReason::GenerationUnavailable,
                INSUFFICIENT_EVIDENCE_MESSAGE,
            ));
        };

        debug!(
            intent = %intent,
            chunks = chunks.len(),
            backend = outcome.backend_used.as_str(),
            "synthesized cited answer"
        );
        Ok(RetrievalOutcome {
            success: true,
            response_text: outcome.text,
            citations: chunks.iter().map(Citation::from_chunk).collect(),
            chunk_count: chunks.len(),
            scores: chunks.iter().map(|c| c.similarity_score).collect(),
            refusal: None,
            chunks,
        })
    }

    /// Search, drop everything below threshold, rank, cap.
    async fn search(
        &self,
        category: DocumentCategory,
        query: &str,
    ) -> ConciergeResult<Vec<RetrievedChunk>> {
        let index = self.index.clone();
        let text = query.to_string();
        let k = self.config.search_candidates.max(self.config.max_chunks);
        let timeout_ms = self.search_timeout.as_millis() as u64;

        let hits = match tokio::time::timeout(
            self.search_timeout,
            tokio::task::spawn_blocking(move || index.similarity_search(category, &text, k)),
        )
        .await
        {
            Ok(Ok(result)) => result.map_err(|e| RetrievalError::SearchFailed {
                collection: category.collection_name().to_string(),
                reason: e.to_string(),
            })?,
            Ok(Err(join)) => {
                return Err(RetrievalError::SearchFailed {
                    collection: category.collection_name().to_string(),
                    reason: format!("search task failed: {join}"),
                }
                .into())
            }
            Err(_) => return Err(RetrievalError::Timeout { timeout_ms }.into()),
        };

        let candidates = hits.len();
        let mut chunks: Vec<RetrievedChunk> = hits
            .into_iter()
            .map(|hit| RetrievedChunk {
                id: hit.id,
                text: hit.text,
                source_label: hit.metadata.source,
                section: hit.metadata.section,
                similarity_score: hit.score.clamp(0.0, 1.0),
            })
            .filter(|c| c.similarity_score >= self.config.similarity_threshold)
            .collect();
        chunks.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        chunks.truncate(self.config.max_chunks);

        debug!(
            collection = category.collection_name(),
            candidates,
            kept = chunks.len(),
            "similarity filter applied"
        );
        Ok(chunks)
    }

    /// Chunk and index one document, replacing any earlier version of it.
    /// Returns the number of chunks written.
    pub async fn index_document(
        &self,
        category: DocumentCategory,
        document_id: &str,
        title: &str,
        text: &str,
        section: &str,
    ) -> ConciergeResult<usize> {
        let chunks = chunker::chunk_text(text, self.config.chunk_size);
        if chunks.is_empty() {
            return Err(RetrievalError::IndexingFailed {
                document_id: document_id.to_string(),
                reason: "document has no text".to_string(),
            }
            .into());
        }

        let total = chunks.len();
        let chunks: Vec<DocumentChunk> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, text)| DocumentChunk {
                id: format!("{document_id}_chunk_{i}"),
                text,
                metadata: DocumentMetadata {
                    document_id: document_id.to_string(),
                    source: title.to_string(),
                    section: section.to_string(),
                    chunk_index: i,
                    total_chunks: total,
                },
            })
            .collect();

        let index = self.index.clone();
        let doc_id = document_id.to_string();
        let written = tokio::task::spawn_blocking(move || {
            index.replace_document(category, &doc_id, &chunks)
        })
        .await
        .map_err(|join| RetrievalError::IndexingFailed {
            document_id: document_id.to_string(),
            reason: join.to_string(),
        })?
        .map_err(|e| RetrievalError::IndexingFailed {
            document_id: document_id.to_string(),
            reason: e.to_string(),
        })?;

        info!(
            document_id,
            collection = category.collection_name(),
            chunks = written,
            "indexed document"
        );
        Ok(written)
    }

    /// Chunks currently indexed for `category`.
    pub fn document_count(&self, category: DocumentCategory) -> ConciergeResult<usize> {
        self.index.count(category)
    }
}

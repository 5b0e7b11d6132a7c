use crate::errors::ConciergeResult;
use crate::models::{DocumentCategory, DocumentChunk, DocumentHit, DocumentMetadata};

/// Similarity-searchable document index, one named collection per category.
pub trait IDocumentIndex: Send + Sync {
    /// Top `k` hits for `query`, best first.
    fn similarity_search(
        &self,
        category: DocumentCategory,
        query: &str,
        k: usize,
    ) -> ConciergeResult<Vec<DocumentHit>>;

    /// Add or replace one chunk.
    fn add(
        &self,
        category: DocumentCategory,
        id: &str,
        text: &str,
        metadata: &DocumentMetadata,
    ) -> ConciergeResult<()>;

    /// Drop every chunk stored for `document_id` and write `chunks` in its
    /// place. All or nothing: on error the previous version stays intact.
    fn replace_document(
        &self,
        category: DocumentCategory,
        document_id: &str,
        chunks: &[DocumentChunk],
    ) -> ConciergeResult<usize>;

    /// Number of chunks in a collection.
    fn count(&self, category: DocumentCategory) -> ConciergeResult<usize>;
}

//! SqliteDocumentIndex: the policy and help chunk collections.

use std::sync::Arc;

use tracing::debug;

use concierge_core::errors::ConciergeResult;
use concierge_core::models::{DocumentCategory, DocumentChunk, DocumentHit, DocumentMetadata};
use concierge_core::traits::{IDocumentIndex, IEmbeddingProvider};

use crate::pool::DbConnection;
use crate::queries::chunk_ops;
use crate::to_storage_err;

pub struct SqliteDocumentIndex {
    db: Arc<DbConnection>,
    embedder: Arc<dyn IEmbeddingProvider>,
}

impl SqliteDocumentIndex {
    pub(crate) fn new(db: Arc<DbConnection>, embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        Self { db, embedder }
    }
}

impl IDocumentIndex for SqliteDocumentIndex {
    fn similarity_search(
        &self,
        category: DocumentCategory,
        query: &str,
        k: usize,
    ) -> ConciergeResult<Vec<DocumentHit>> {
        // Embed before taking the connection lock.
        let query_embedding = self.embedder.embed(query)?;
        self.db.with_conn(|conn| {
            chunk_ops::search_chunks(conn, category.collection_name(), &query_embedding, k)
        })
    }

    fn add(
        &self,
        category: DocumentCategory,
        id: &str,
        text: &str,
        metadata: &DocumentMetadata,
    ) -> ConciergeResult<()> {
        let embedding = self.embedder.embed(text)?;
        self.db.with_conn(|conn| {
            chunk_ops::upsert_chunk(
                conn,
                category.collection_name(),
                id,
                text,
                metadata,
                &embedding,
            )
        })
    }

    fn replace_document(
        &self,
        category: DocumentCategory,
        document_id: &str,
        chunks: &[DocumentChunk],
    ) -> ConciergeResult<usize> {
        // Embed everything up front so a provider failure never touches the
        // stored version.
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != chunks.len() {
            return Err(to_storage_err(format!(
                "expected {} embeddings for {document_id}, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        let collection = category.collection_name();

        let removed = self.db.with_conn(|conn| {
            conn.execute_batch("BEGIN")
                .map_err(|e| to_storage_err(e.to_string()))?;
            match chunk_ops::rewrite_document(conn, collection, document_id, chunks, &embeddings) {
                Ok(removed) => {
                    conn.execute_batch("COMMIT")
                        .map_err(|e| to_storage_err(e.to_string()))?;
                    Ok(removed)
                }
                Err(e) => {
                    let _ = conn.execute_batch("ROLLBACK");
                    Err(e)
                }
            }
        })?;
        debug!(collection, document_id, removed, written = chunks.len(), "replaced document");
        Ok(chunks.len())
    }

    fn count(&self, category: DocumentCategory) -> ConciergeResult<usize> {
        self.db
            .with_conn(|conn| chunk_ops::count_chunks(conn, category.collection_name()))
    }
}

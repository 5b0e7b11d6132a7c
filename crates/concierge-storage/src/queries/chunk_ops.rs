//! Chunk storage and brute-force cosine search over stored embeddings.

use rusqlite::{params, Connection};

use concierge_core::errors::ConciergeResult;
use concierge_core::models::{DocumentChunk, DocumentHit, DocumentMetadata};
use concierge_embeddings::cosine_similarity;

use crate::to_storage_err;

pub fn upsert_chunk(
    conn: &Connection,
    collection: &str,
    id: &str,
    text: &str,
    metadata: &DocumentMetadata,
    embedding: &[f32],
) -> ConciergeResult<()> {
    conn.execute(
        "INSERT INTO document_chunks
            (collection, id, text, document_id, source, section, chunk_index, total_chunks, embedding, dimensions)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(collection, id) DO UPDATE SET
            text = excluded.text,
            document_id = excluded.document_id,
            source = excluded.source,
            section = excluded.section,
            chunk_index = excluded.chunk_index,
            total_chunks = excluded.total_chunks,
            embedding = excluded.embedding,
            dimensions = excluded.dimensions",
        params![
            collection,
            id,
            text,
            metadata.document_id,
            metadata.source,
            metadata.section,
            metadata.chunk_index as i64,
            metadata.total_chunks as i64,
            f32_vec_to_bytes(embedding),
            embedding.len() as i64,
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert chunk {collection}/{id}: {e}")))?;
    Ok(())
}

/// Remove every chunk of one document. Returns the number of rows deleted.
pub fn delete_document_chunks(
    conn: &Connection,
    collection: &str,
    document_id: &str,
) -> ConciergeResult<usize> {
    conn.execute(
        "DELETE FROM document_chunks WHERE collection = ?1 AND document_id = ?2",
        params![collection, document_id],
    )
    .map_err(|e| to_storage_err(format!("delete chunks of {collection}/{document_id}: {e}")))
}

/// Delete the document's chunks, then write `chunks` with their embeddings.
/// The caller owns the transaction. Returns how many old rows were removed.
pub fn rewrite_document(
    conn: &Connection,
    collection: &str,
    document_id: &str,
    chunks: &[DocumentChunk],
    embeddings: &[Vec<f32>],
) -> ConciergeResult<usize> {
    let removed = delete_document_chunks(conn, collection, document_id)?;
    for (chunk, embedding) in chunks.iter().zip(embeddings) {
        upsert_chunk(conn, collection, &chunk.id, &chunk.text, &chunk.metadata, embedding)?;
    }
    Ok(removed)
}

pub fn count_chunks(conn: &Connection, collection: &str) -> ConciergeResult<usize> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM document_chunks WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n.max(0) as usize)
}

/// Top `limit` chunks by cosine similarity, best first. Scores are clamped
/// to `[0, 1]`; rows with a different dimensionality or a non-positive
/// score are skipped.
pub fn search_chunks(
    conn: &Connection,
    collection: &str,
    query_embedding: &[f32],
    limit: usize,
) -> ConciergeResult<Vec<DocumentHit>> {
    if limit == 0 || query_embedding.iter().all(|x| *x == 0.0) {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT id, text, document_id, source, section, chunk_index, total_chunks, embedding, dimensions
             FROM document_chunks WHERE collection = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![collection], |row| {
            let dims: i64 = row.get(8)?;
            let blob: Vec<u8> = row.get(7)?;
            let metadata = DocumentMetadata {
                document_id: row.get(2)?,
                source: row.get(3)?,
                section: row.get(4)?,
                chunk_index: row.get::<_, i64>(5)?.max(0) as usize,
                total_chunks: row.get::<_, i64>(6)?.max(0) as usize,
            };
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, metadata, blob, dims))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut hits = Vec::new();
    for row in rows {
        let (id, text, metadata, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        if dims as usize != query_embedding.len() {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob);
        let score = cosine_similarity(query_embedding, &stored).clamp(0.0, 1.0);
        if score > 0.0 {
            hits.push(DocumentHit {
                id,
                text,
                metadata,
                score,
            });
        }
    }

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(limit);
    Ok(hits)
}

fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_encoding_is_lossless() {
        let v = vec![0.25_f32, -1.5, 3.0e-7];
        assert_eq!(bytes_to_f32_vec(&f32_vec_to_bytes(&v)), v);
    }
}

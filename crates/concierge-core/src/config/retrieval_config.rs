use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks scoring below this are discarded.
    pub similarity_threshold: f64,
    /// Maximum chunks placed in the synthesis context.
    pub max_chunks: usize,
    /// Candidates requested from the index before filtering.
    pub search_candidates: usize,
    /// Target chunk size in characters for ingestion.
    pub chunk_size: usize,
    pub synthesis_max_tokens: u32,
    pub synthesis_temperature: f32,
    pub search_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            max_chunks: defaults::DEFAULT_MAX_CHUNKS,
            search_candidates: defaults::DEFAULT_SEARCH_CANDIDATES,
            chunk_size: defaults::DEFAULT_CHUNK_SIZE,
            synthesis_max_tokens: defaults::DEFAULT_SYNTHESIS_MAX_TOKENS,
            synthesis_temperature: defaults::DEFAULT_SYNTHESIS_TEMPERATURE,
            search_timeout_ms: defaults::DEFAULT_SEARCH_TIMEOUT_MS,
        }
    }
}

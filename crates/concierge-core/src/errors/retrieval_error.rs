use super::error_code::{self, ConciergeErrorCode};

/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("similarity search failed in {collection}: {reason}")]
    SearchFailed { collection: String, reason: String },

    #[error("indexing {document_id} failed: {reason}")]
    IndexingFailed { document_id: String, reason: String },

    #[error("similarity search timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl ConciergeErrorCode for RetrievalError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_FAILURE
    }
}

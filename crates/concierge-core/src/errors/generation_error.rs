use super::error_code::{self, ConciergeErrorCode};

/// Failures of a single generation backend call.
///
/// These never escape the generation facade; the facade turns them into
/// counters and an absent outcome.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("backend {backend} is not configured: {reason}")]
    NotConfigured { backend: String, reason: String },

    #[error("backend {backend} timed out after {timeout_ms}ms")]
    Timeout { backend: String, timeout_ms: u64 },

    #[error("backend {backend} request failed: {reason}")]
    RequestFailed { backend: String, reason: String },

    #[error("backend {backend} returned HTTP {status}: {body}")]
    HttpStatus {
        backend: String,
        status: u16,
        body: String,
    },

    #[error("backend {backend} returned an empty completion")]
    EmptyCompletion { backend: String },

    #[error("all generation backends failed")]
    Unavailable,
}

impl ConciergeErrorCode for GenerationError {
    fn error_code(&self) -> &'static str {
        error_code::GENERATION_UNAVAILABLE
    }
}

use super::error_code::{self, ConciergeErrorCode};
use super::{
    BoundaryError, ConfigError, EmbeddingError, GenerationError, RetrievalError, StorageError,
};

/// Top-level error type. Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ConciergeError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("generation error: {0}")]
    GenerationError(#[from] GenerationError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("boundary error: {0}")]
    BoundaryError(#[from] BoundaryError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,
}

impl ConciergeErrorCode for ConciergeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::StorageError(e) => e.error_code(),
            Self::EmbeddingError(e) => e.error_code(),
            Self::GenerationError(e) => e.error_code(),
            Self::RetrievalError(e) => e.error_code(),
            Self::BoundaryError(e) => e.error_code(),
            Self::ConfigError(e) => e.error_code(),
            Self::SerializationError(_) => error_code::STORAGE_FAILURE,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type ConciergeResult<T> = Result<T, ConciergeError>;

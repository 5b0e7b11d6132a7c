use super::error_code::{self, ConciergeErrorCode};

/// Structured store and document index errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("record serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("store query timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl ConciergeErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_FAILURE
    }
}

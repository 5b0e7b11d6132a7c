//! Stable machine-readable error codes.
//!
//! Codes are what crosses the boundary and what telemetry aggregates on.
//! Error display text never does.

pub const UNKNOWN_INTENT: &str = "UNKNOWN_INTENT";
pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
pub const SCOPE_VIOLATION: &str = "SCOPE_VIOLATION";
pub const RETRIEVAL_REFUSAL: &str = "RETRIEVAL_REFUSAL";
pub const STORAGE_FAILURE: &str = "STORAGE_FAILURE";
pub const GENERATION_UNAVAILABLE: &str = "GENERATION_UNAVAILABLE";
pub const BOUNDARY_VALIDATION: &str = "BOUNDARY_VALIDATION";
pub const EMBEDDING_FAILURE: &str = "EMBEDDING_FAILURE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CANCELLED: &str = "CANCELLED";

/// Implemented by every error enum in the workspace.
pub trait ConciergeErrorCode {
    fn error_code(&self) -> &'static str;
}

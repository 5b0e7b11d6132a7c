//! Errors raised while validating a request at the public boundary.

use super::error_code::{self, ConciergeErrorCode};

/// Rejections that happen before a request enters the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    #[error("invalid role: {value}. Must be consumer/provider/administrator")]
    InvalidRole { value: String },

    #[error("unrecognized intent: {value}")]
    UnknownIntent { value: String },

    #[error("query must be between {min} and {max} characters, got {actual}")]
    QueryLength { min: usize, max: usize, actual: usize },

    #[error("missing required field: {field}")]
    MissingField { field: String },
}

impl ConciergeErrorCode for BoundaryError {
    fn error_code(&self) -> &'static str {
        error_code::BOUNDARY_VALIDATION
    }
}

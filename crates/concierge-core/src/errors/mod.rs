//! Error handling for Concierge.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod boundary_error;
pub mod concierge_error;
pub mod config_error;
pub mod embedding_error;
pub mod error_code;
pub mod generation_error;
pub mod retrieval_error;
pub mod storage_error;

pub use boundary_error::BoundaryError;
pub use concierge_error::{ConciergeError, ConciergeResult};
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use error_code::ConciergeErrorCode;
pub use generation_error::GenerationError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

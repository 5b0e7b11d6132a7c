//! # concierge-storage
//!
//! SQLite persistence for the two external stores the pipeline reads:
//! the structured record store (users, listings, saved items, analytics
//! events, bookings, moderation queues) and the policy/help chunk index.
//!
//! Both share one serialized connection. Calls are blocking; async callers
//! run them on the blocking pool.

pub mod document_index;
pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use document_index::SqliteDocumentIndex;
pub use engine::StorageEngine;

use concierge_core::errors::{ConciergeError, StorageError};

/// Helper to convert a string error into a `ConciergeError::StorageError`.
pub(crate) fn to_storage_err(msg: impl Into<String>) -> ConciergeError {
    ConciergeError::StorageError(StorageError::Sqlite {
        message: msg.into(),
    })
}

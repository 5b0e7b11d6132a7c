//! # concierge-retrieval
//!
//! Answers policy and help questions from indexed documents only.
//!
//! ```text
//! query ─▶ structured-only intent? ──yes──▶ refuse
//!            │ no
//!            ▼
//!        similarity search ─▶ drop < threshold ─▶ none left? ──▶ refuse
//!            │
//!            ▼
//!        [Source N] context ─▶ generation facade ─▶ cited answer | refuse
//! ```

pub mod chunker;
pub mod engine;
pub mod prompt;

pub use chunker::chunk_text;
pub use engine::RetrievalEngine;

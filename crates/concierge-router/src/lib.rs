//! # concierge-router
//!
//! Turns an intent decision and an authorization result into one
//! [`QueryResponse`](concierge_core::QueryResponse).
//!
//! ```text
//! denied ─────────────────────────────▶ denial response
//! structured ──▶ DataEngine ──▶ format (facade | template)
//! retrieval  ──▶ RetrievalEngine (cited answer | refusal)
//! hybrid     ──▶ both, joined ──▶ combined synthesis (facade | template)
//! none ───────────────────────────────▶ clarification
//! ```

pub mod format;
pub mod responses;
pub mod router;

pub use router::QueryRouter;

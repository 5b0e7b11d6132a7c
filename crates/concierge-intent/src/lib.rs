//! # concierge-intent
//!
//! Maps a query to one [`Intent`](concierge_core::Intent).
//!
//! ```text
//! query ─▶ trim ─┬─ empty ───────────────────────────▶ Unknown (none)
//!                ├─ lexical rule groups, first hit ──▶ intent  (pattern, 1.0)
//!                └─ embed ─▶ max cosine vs exemplars
//!                              ├─ ≥ threshold ───────▶ intent  (embedding)
//!                              └─ < threshold ───────▶ Unknown (embedding)
//! ```

pub mod classifier;
pub mod exemplars;
pub mod patterns;

pub use classifier::IntentClassifier;

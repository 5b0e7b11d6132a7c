//! # concierge-generation
//!
//! Single-call text generation with exactly one fallback hop.
//!
//! ```text
//! GenerationFacade::generate
//!   ├── primary   (timeout) ── ok ──▶ outcome
//!   │      └── err/timeout
//!   └── secondary (timeout) ── ok ──▶ outcome (fallback_used)
//!          └── err/timeout ─────────▶ None
//! ```

pub mod backends;
pub mod facade;
pub mod stats;

pub use backends::{GeminiBackend, OpenAiCompatibleBackend};
pub use facade::GenerationFacade;
pub use stats::GenerationStats;

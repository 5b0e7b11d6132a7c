//! # concierge-runtime
//!
//! Owns every engine and exposes the single query entry point.
//!
//! ```text
//! QueryRequest ──validate──▶ RequestScope
//!   ──▶ IntentClassifier ──▶ RoleValidator ──▶ QueryRouter ──▶ QueryResponse
//! ```
//!
//! Built once at startup with [`ConciergeRuntime::builder`] and shared by
//! reference; there is no process-wide instance.

pub mod builder;
pub mod health;
pub mod runtime;

pub use builder::RuntimeBuilder;
pub use health::{ComponentHealth, HealthReport, HealthStatus};
pub use runtime::{ConciergeRuntime, RuntimeStats};

//! # concierge-core
//!
//! Foundation crate for the Concierge query pipeline.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ConciergeConfig;
pub use errors::{ConciergeError, ConciergeResult};
pub use intent::{Intent, RoutingFlags, RoutingTable};
pub use models::{
    AuthorizationResult, ClassificationMethod, DataSource, IntentDecision, QueryResponse, Role,
};

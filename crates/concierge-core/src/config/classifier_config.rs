use serde::{Deserialize, Serialize};

use super::defaults;

/// Intent classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Embedding matches below this confidence become `Unknown`.
    pub confidence_threshold: f64,
    /// Bound on each embedding call, in milliseconds.
    pub embedding_timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: defaults::DEFAULT_CONFIDENCE_THRESHOLD,
            embedding_timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
        }
    }
}

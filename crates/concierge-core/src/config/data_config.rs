use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::TimeRange;

/// Structured data engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Row cap for list-shaped results.
    pub default_limit: usize,
    pub default_time_range: TimeRange,
    /// Size of "top N" breakdowns.
    pub top_n: usize,
    pub store_timeout_ms: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::DEFAULT_RESULT_LIMIT,
            default_time_range: TimeRange::default(),
            top_n: defaults::DEFAULT_TOP_N,
            store_timeout_ms: defaults::DEFAULT_STORE_TIMEOUT_MS,
        }
    }
}

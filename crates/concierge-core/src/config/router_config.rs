use serde::{Deserialize, Serialize};

use super::defaults;
use crate::intent::Intent;

/// Query router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Use the generation facade to phrase structured results.
    pub formatting_enabled: bool,
    pub format_max_tokens: u32,
    pub format_temperature: f32,
    pub hybrid_max_tokens: u32,
    /// Intents promoted to need both data paths.
    pub hybrid_intents: Vec<Intent>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            formatting_enabled: defaults::DEFAULT_FORMATTING_ENABLED,
            format_max_tokens: defaults::DEFAULT_FORMAT_MAX_TOKENS,
            format_temperature: defaults::DEFAULT_FORMAT_TEMPERATURE,
            hybrid_max_tokens: defaults::DEFAULT_HYBRID_MAX_TOKENS,
            hybrid_intents: Vec::new(),
        }
    }
}

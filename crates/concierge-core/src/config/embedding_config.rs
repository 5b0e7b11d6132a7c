use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider type: "api" or "tfidf".
    pub provider: String,
    /// Embedding dimensions.
    pub dimensions: usize,
    /// API endpoint for the "api" provider.
    pub api_endpoint: Option<String>,
    /// Model name sent to the API provider.
    pub api_model: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// L1 in-memory cache max entries.
    pub l1_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            api_endpoint: None,
            api_model: None,
            api_key_env: defaults::DEFAULT_EMBEDDING_API_KEY_ENV.to_string(),
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Wire protocol spoken by a generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// `POST {base_url}/chat/completions`.
    OpenAiCompatible,
    /// `POST {base_url}/models/{model}:generateContent`.
    Gemini,
}

/// Connection settings for one backend. The key itself is read from the
/// environment variable named by `api_key_env`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
}

impl BackendConfig {
    pub fn primary_default() -> Self {
        Self {
            kind: BackendKind::OpenAiCompatible,
            base_url: defaults::DEFAULT_PRIMARY_BASE_URL.to_string(),
            model: defaults::DEFAULT_PRIMARY_MODEL.to_string(),
            api_key_env: defaults::DEFAULT_PRIMARY_API_KEY_ENV.to_string(),
        }
    }

    pub fn secondary_default() -> Self {
        Self {
            kind: BackendKind::Gemini,
            base_url: defaults::DEFAULT_SECONDARY_BASE_URL.to_string(),
            model: defaults::DEFAULT_SECONDARY_MODEL.to_string(),
            api_key_env: defaults::DEFAULT_SECONDARY_API_KEY_ENV.to_string(),
        }
    }
}

/// Generation facade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Per-backend timeout in seconds.
    pub timeout_secs: u64,
    pub primary: BackendConfig,
    pub secondary: BackendConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::DEFAULT_GENERATION_TIMEOUT_SECS,
            primary: BackendConfig::primary_default(),
            secondary: BackendConfig::secondary_default(),
        }
    }
}

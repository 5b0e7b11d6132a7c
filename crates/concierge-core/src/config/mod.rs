//! Configuration: one struct per subsystem, aggregated by [`ConciergeConfig`].
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`CONCIERGE_*`)
//! 2. TOML config file
//! 3. Compiled defaults (`defaults.rs`)

pub mod classifier_config;
pub mod data_config;
pub mod defaults;
pub mod embedding_config;
pub mod generation_config;
pub mod observability_config;
pub mod retrieval_config;
pub mod router_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use classifier_config::ClassifierConfig;
pub use data_config::DataConfig;
pub use embedding_config::EmbeddingConfig;
pub use generation_config::{BackendConfig, BackendKind, GenerationConfig};
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use router_config::RouterConfig;
pub use storage_config::StorageConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConciergeConfig {
    pub classifier: ClassifierConfig,
    pub retrieval: RetrievalConfig,
    pub data: DataConfig,
    pub generation: GenerationConfig,
    pub embedding: EmbeddingConfig,
    pub router: RouterConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl ConciergeConfig {
    /// Load configuration: defaults, then `path` if given, then environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeFailed {
            message: e.to_string(),
        })
    }

    /// Apply `CONCIERGE_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Unparseable values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CONCIERGE_CONFIDENCE_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.classifier.confidence_threshold = v;
        }
        if let Some(v) = lookup("CONCIERGE_SIMILARITY_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.retrieval.similarity_threshold = v;
        }
        if let Some(v) = lookup("CONCIERGE_GENERATION_TIMEOUT_SECS").and_then(|v| v.parse().ok())
        {
            self.generation.timeout_secs = v;
        }
        if let Some(v) = lookup("CONCIERGE_FORMATTING_ENABLED").and_then(|v| v.parse().ok()) {
            self.router.formatting_enabled = v;
        }
        if let Some(v) = lookup("CONCIERGE_EMBEDDING_PROVIDER") {
            self.embedding.provider = v;
        }
        if let Some(v) = lookup("CONCIERGE_DB_PATH") {
            self.storage.db_path = Some(v);
        }
        if let Some(v) = lookup("CONCIERGE_LOG_LEVEL") {
            self.observability.log_level = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                })
            }
        }
        fn positive(field: &str, value: u64) -> Result<(), ConfigError> {
            if value > 0 {
                Ok(())
            } else {
                Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                })
            }
        }

        unit_interval(
            "classifier.confidence_threshold",
            self.classifier.confidence_threshold,
        )?;
        unit_interval(
            "retrieval.similarity_threshold",
            self.retrieval.similarity_threshold,
        )?;
        positive("retrieval.max_chunks", self.retrieval.max_chunks as u64)?;
        positive("retrieval.chunk_size", self.retrieval.chunk_size as u64)?;
        if self.retrieval.search_candidates < self.retrieval.max_chunks {
            return Err(ConfigError::ValidationFailed {
                field: "retrieval.search_candidates".to_string(),
                message: "must be at least retrieval.max_chunks".to_string(),
            });
        }
        positive("data.default_limit", self.data.default_limit as u64)?;
        positive("generation.timeout_secs", self.generation.timeout_secs)?;
        positive("embedding.dimensions", self.embedding.dimensions as u64)?;
        match self.embedding.provider.as_str() {
            "tfidf" => {}
            "api" => {
                if self.embedding.api_endpoint.is_none() {
                    return Err(ConfigError::ValidationFailed {
                        field: "embedding.api_endpoint".to_string(),
                        message: "required when embedding.provider = \"api\"".to_string(),
                    });
                }
            }
            other => {
                return Err(ConfigError::ValidationFailed {
                    field: "embedding.provider".to_string(),
                    message: format!("unknown provider \"{other}\", expected \"api\" or \"tfidf\""),
                });
            }
        }
        for (field, temp) in [
            ("router.format_temperature", self.router.format_temperature),
            (
                "retrieval.synthesis_temperature",
                self.retrieval.synthesis_temperature,
            ),
        ] {
            if !(0.0..=2.0).contains(&temp) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 2.0".to_string(),
                });
            }
        }
        Ok(())
    }
}

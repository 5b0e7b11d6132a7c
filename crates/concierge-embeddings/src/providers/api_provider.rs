//! HTTP embedding provider for OpenAI-compatible `/embeddings` endpoints.
//!
//! Blocking client: callers on an async runtime run it on the blocking pool.
//! One attempt per call. Three consecutive failures open a short cooldown
//! during which the provider reports itself unavailable and the chain skips it.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;

use chrono::Utc;
use concierge_core::config::EmbeddingConfig;
use concierge_core::errors::{ConciergeResult, EmbeddingError};
use concierge_core::traits::IEmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const FAILURES_BEFORE_COOLDOWN: u32 = 3;
const COOLDOWN_MS: i64 = 30_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Cloud API embedding provider.
pub struct ApiProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
    consecutive_failures: AtomicU32,
    unavailable_until_ms: AtomicI64,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl ApiProvider {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        dimensions: usize,
    ) -> ConciergeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: format!("api: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            dimensions,
            consecutive_failures: AtomicU32::new(0),
            unavailable_until_ms: AtomicI64::new(0),
        })
    }

    /// Build from config; the key comes from the configured env variable.
    pub fn from_config(config: &EmbeddingConfig) -> ConciergeResult<Self> {
        let endpoint =
            config
                .api_endpoint
                .clone()
                .ok_or_else(|| EmbeddingError::ProviderUnavailable {
                    provider: "api: no endpoint configured".to_string(),
                })?;
        let model = config
            .api_model
            .clone()
            .unwrap_or_else(|| "text-embedding-3-small".to_string());
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::new(endpoint, model, api_key, config.dimensions)
    }

    fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1;
        if failures >= FAILURES_BEFORE_COOLDOWN {
            let until = Utc::now().timestamp_millis() + COOLDOWN_MS;
            self.unavailable_until_ms.store(until, Ordering::Release);
            warn!(failures, cooldown_ms = COOLDOWN_MS, "embedding API cooling down");
        }
    }

    fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Release);
        self.unavailable_until_ms.store(0, Ordering::Release);
    }

    fn request_embeddings(&self, texts: &[String]) -> ConciergeResult<Vec<Vec<f32>>> {
        if !self.is_available() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
            }
            .into());
        }

        match self.send(texts) {
            Ok(vectors) => {
                self.record_success();
                Ok(vectors)
            }
            Err(e) => {
                self.record_failure();
                Err(e)
            }
        }
    }

    fn send(&self, texts: &[String]) -> ConciergeResult<Vec<Vec<f32>>> {
        let mut request = self.client.post(&self.endpoint).json(&EmbedRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| EmbeddingError::InferenceFailed {
            reason: format!("request failed: {e}"),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("HTTP {status}"),
            }
            .into());
        }

        let parsed: EmbedResponse =
            response.json().map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("invalid response body: {e}"),
            })?;
        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.data.len()
                ),
            }
            .into());
        }

        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.len(),
            }
            .into());
        }
        debug!(count = vectors.len(), "API embeddings received");
        Ok(vectors)
    }
}

impl IEmbeddingProvider for ApiProvider {
    fn embed(&self, text: &str) -> ConciergeResult<Vec<f32>> {
        let mut vectors = self.request_embeddings(&[text.to_string()])?;
        vectors.pop().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> ConciergeResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "api"
    }

    fn is_available(&self) -> bool {
        Utc::now().timestamp_millis() >= self.unavailable_until_ms.load(Ordering::Acquire)
    }
}

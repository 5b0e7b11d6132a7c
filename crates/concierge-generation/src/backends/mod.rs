//! HTTP generation backends.

pub mod gemini;
pub mod openai_compatible;

use std::sync::Arc;

use concierge_core::config::{BackendConfig, BackendKind};
use concierge_core::errors::GenerationError;
use concierge_core::traits::IGenerationBackend;

pub use gemini::GeminiBackend;
pub use openai_compatible::OpenAiCompatibleBackend;

/// Build a backend for `config`. A missing API key yields a backend that
/// reports itself unavailable rather than an error.
pub fn from_config(config: &BackendConfig) -> Result<Arc<dyn IGenerationBackend>, GenerationError> {
    let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
    Ok(match config.kind {
        BackendKind::OpenAiCompatible => Arc::new(OpenAiCompatibleBackend::new(
            &config.base_url,
            &config.model,
            api_key,
        )?),
        BackendKind::Gemini => {
            Arc::new(GeminiBackend::new(&config.base_url, &config.model, api_key)?)
        }
    })
}

/// Shared client construction. The facade owns the timeout, so the client
/// only bounds connection setup.
pub(crate) fn http_client(backend: &str) -> Result<reqwest::Client, GenerationError> {
    reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(5))
        .build()
        .map_err(|e| GenerationError::NotConfigured {
            backend: backend.to_string(),
            reason: e.to_string(),
        })
}

/// Turn a non-success HTTP response into an error, keeping a short body excerpt
/// for the log.
pub(crate) async fn check_status(
    backend: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GenerationError::HttpStatus {
        backend: backend.to_string(),
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    })
}

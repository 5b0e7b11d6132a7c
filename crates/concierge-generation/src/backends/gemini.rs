//! Gemini `generateContent` backend.
//!
//! Gemini takes no separate system turn here, so the system message is
//! prepended to the prompt.

use async_trait::async_trait;
use concierge_core::errors::GenerationError;
use concierge_core::models::GenerationRequest;
use concierge_core::traits::IGenerationBackend;
use serde::{Deserialize, Serialize};

use super::{check_status, http_client};

const NAME: &str = "gemini";

pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationParams,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiBackend {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(NAME)?,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            api_key,
        })
    }

    fn combined_prompt(request: &GenerationRequest) -> String {
        match request.system_message.as_deref() {
            Some(system) => format!("{system}\n\n{}", request.prompt),
            None => request.prompt.clone(),
        }
    }
}

#[async_trait]
impl IGenerationBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured {
                backend: NAME.to_string(),
                reason: "missing API key".to_string(),
            })?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::combined_prompt(request),
                }],
            }],
            generation_config: GenerationParams {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed {
                backend: NAME.to_string(),
                reason: e.without_url().to_string(),
            })?;
        let response = check_status(NAME, response).await?;

        let parsed: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::RequestFailed {
                    backend: NAME.to_string(),
                    reason: format!("invalid response body: {}", e.without_url()),
                })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::EmptyCompletion {
                backend: NAME.to_string(),
            });
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

//! OpenAI-compatible chat completions backend (Groq, OpenAI, local servers).

use async_trait::async_trait;
use concierge_core::errors::GenerationError;
use concierge_core::models::GenerationRequest;
use concierge_core::traits::IGenerationBackend;
use serde::{Deserialize, Serialize};

use super::{check_status, http_client};

const NAME: &str = "openai-compatible";

pub struct OpenAiCompatibleBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleBackend {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(NAME)?,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl IGenerationBackend for OpenAiCompatibleBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured {
                backend: NAME.to_string(),
                reason: "missing API key".to_string(),
            })?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_message.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed {
                backend: NAME.to_string(),
                reason: e.to_string(),
            })?;
        let response = check_status(NAME, response).await?;

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::RequestFailed {
                    backend: NAME.to_string(),
                    reason: format!("invalid response body: {e}"),
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| GenerationError::EmptyCompletion {
                backend: NAME.to_string(),
            })
    }

    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

//! Fallback chain for embedding generation.
//!
//! Providers are tried in priority order; each fallback past the first is
//! recorded as a `DegradationEvent` and logged.

use std::sync::Mutex;

use chrono::Utc;
use concierge_core::errors::{ConciergeResult, EmbeddingError};
use concierge_core::models::DegradationEvent;
use concierge_core::traits::IEmbeddingProvider;
use tracing::warn;

/// Ordered provider chain with an internal degradation log.
pub struct DegradationChain {
    chain: Vec<Box<dyn IEmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Box<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Embed with the first provider that is available and succeeds.
    /// Returns the vector and the name of the provider that produced it.
    pub fn embed(&self, text: &str) -> ConciergeResult<(Vec<f32>, &str)> {
        self.run(|p| p.embed(text))
    }

    /// Batch variant of [`embed`](Self::embed).
    pub fn embed_batch(&self, texts: &[String]) -> ConciergeResult<(Vec<Vec<f32>>, &str)> {
        self.run(|p| p.embed_batch(texts))
    }

    fn run<T, F>(&self, mut call: F) -> ConciergeResult<(T, &str)>
    where
        F: FnMut(&dyn IEmbeddingProvider) -> ConciergeResult<T>,
    {
        let mut last_error = None;

        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }

            match call(provider.as_ref()) {
                Ok(out) => {
                    if i > 0 {
                        let primary = self.chain.first().map(|p| p.name()).unwrap_or("unknown");
                        self.record(DegradationEvent {
                            component: "embeddings".to_string(),
                            failure: format!("{primary} unavailable"),
                            fallback_used: provider.name().to_string(),
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok((out, provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: "all providers exhausted".to_string(),
            }
            .into()
        }))
    }

    fn record(&self, event: DegradationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    /// Whether any provider can currently serve requests.
    pub fn any_available(&self) -> bool {
        self.chain.iter().any(|p| p.is_available())
    }

    /// Take all recorded degradation events.
    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

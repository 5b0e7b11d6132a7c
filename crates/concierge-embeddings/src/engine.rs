//! EmbeddingEngine: the entry point for concierge-embeddings.
//!
//! Coordinates the provider chain and the L1 cache. Implements
//! `IEmbeddingProvider`, so it can be handed to anything that wants one.

use concierge_core::config::EmbeddingConfig;
use concierge_core::errors::{ConciergeResult, EmbeddingError};
use concierge_core::models::DegradationEvent;
use concierge_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::L1MemoryCache;
use crate::degradation::DegradationChain;
use crate::providers;

/// Cached, degradable embedding engine.
pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: L1MemoryCache,
    dimensions: usize,
}

impl EmbeddingEngine {
    /// Configured provider first, TF-IDF as the last resort.
    pub fn new(config: &EmbeddingConfig) -> Self {
        let mut chain = DegradationChain::new();
        chain.push(providers::create_provider(config));
        if config.provider != "tfidf" {
            chain.push(Box::new(providers::TfIdfFallback::new(config.dimensions)));
        }
        Self::with_chain(chain, config.dimensions, config.l1_cache_size)
    }

    /// Engine over an explicit chain.
    pub fn with_chain(chain: DegradationChain, dimensions: usize, cache_size: u64) -> Self {
        info!(
            provider = chain.active_provider_name(),
            providers = chain.len(),
            dims = dimensions,
            "EmbeddingEngine initialized"
        );
        Self {
            chain,
            cache: L1MemoryCache::new(cache_size),
            dimensions,
        }
    }

    /// Drain degradation events recorded by the chain.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn cache(&self) -> &L1MemoryCache {
        &self.cache
    }

    fn check_dimensions(&self, v: &[f32]) -> ConciergeResult<()> {
        if v.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: v.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> ConciergeResult<Vec<f32>> {
        let key = L1MemoryCache::key_for(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "embedding cache hit");
            return Ok(hit);
        }

        let (embedding, provider) = self.chain.embed(text)?;
        self.check_dimensions(&embedding)?;
        debug!(provider, "embedding computed");
        self.cache.insert(key, embedding.clone());
        Ok(embedding)
    }

    /// Cached texts are served from L1; the misses go through the chain as
    /// one batch and are cached individually.
    fn embed_batch(&self, texts: &[String]) -> ConciergeResult<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| L1MemoryCache::key_for(t)).collect();
        let mut out: Vec<Option<Vec<f32>>> = keys.iter().map(|k| self.cache.get(k)).collect();

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        if !missing.is_empty() {
            let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let (embeddings, provider) = self.chain.embed_batch(&batch)?;
            if embeddings.len() != batch.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!(
                        "{provider} returned {} embeddings for {} texts",
                        embeddings.len(),
                        batch.len()
                    ),
                }
                .into());
            }
            debug!(
                provider,
                computed = batch.len(),
                cached = texts.len() - batch.len(),
                "batch embedded"
            );
            for (i, embedding) in missing.into_iter().zip(embeddings) {
                self.check_dimensions(&embedding)?;
                self.cache.insert(keys[i].clone(), embedding.clone());
                out[i] = Some(embedding);
            }
        }

        Ok(out.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "concierge-embedding-engine"
    }

    fn is_available(&self) -> bool {
        self.chain.any_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EmbeddingEngine {
        EmbeddingEngine::new(&EmbeddingConfig {
            dimensions: 64,
            ..Default::default()
        })
    }

    #[test]
    fn embeds_with_configured_dimensions() {
        let e = engine();
        assert_eq!(e.embed("refund policy").unwrap().len(), 64);
        assert_eq!(e.dimensions(), 64);
    }

    #[test]
    fn repeated_embeds_hit_cache() {
        let e = engine();
        let a = e.embed("cached query").unwrap();
        let b = e.embed("cached query").unwrap();
        assert_eq!(a, b);
        assert!(e.cache().get(&L1MemoryCache::key_for("cached query")).is_some());
    }

    #[test]
    fn api_config_without_endpoint_degrades_to_tfidf() {
        let e = EmbeddingEngine::new(&EmbeddingConfig {
            provider: "api".to_string(),
            dimensions: 32,
            ..Default::default()
        });
        assert_eq!(e.active_provider(), "tfidf-fallback");
        assert!(e.is_available());
    }

    #[test]
    fn batch_fills_cache_per_text_and_reuses_hits() {
        let e = engine();
        let warm = e.embed("refund policy").unwrap();

        let texts = vec![
            "refund policy".to_string(),
            "upload photos".to_string(),
            "refund policy".to_string(),
        ];
        let batch = e.embed_batch(&texts).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], warm);
        assert_eq!(batch[2], warm);
        assert_eq!(batch[1], e.embed("upload photos").unwrap());
        assert!(e.cache().get(&L1MemoryCache::key_for("upload photos")).is_some());
    }

    struct DownProvider;

    impl IEmbeddingProvider for DownProvider {
        fn embed(&self, _text: &str) -> ConciergeResult<Vec<f32>> {
            Err(EmbeddingError::InferenceFailed {
                reason: "down".to_string(),
            }
            .into())
        }
        fn dimensions(&self) -> usize {
            16
        }
        fn name(&self) -> &str {
            "down"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn batch_through_failing_primary_degrades_once() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(DownProvider));
        chain.push(Box::new(crate::providers::TfIdfFallback::new(16)));
        let e = EmbeddingEngine::with_chain(chain, 16, 100);

        let texts = vec!["one".to_string(), "two".to_string()];
        assert_eq!(e.embed_batch(&texts).unwrap().len(), 2);
        let events = e.drain_degradation_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fallback_used, "tfidf-fallback");

        // Both texts are cached now, so the chain is not consulted again.
        assert_eq!(e.embed_batch(&texts).unwrap().len(), 2);
        assert!(e.drain_degradation_events().is_empty());
        assert!(e.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn no_degradation_events_on_success() {
        let e = engine();
        e.embed("test").unwrap();
        assert!(e.drain_degradation_events().is_empty());
    }
}

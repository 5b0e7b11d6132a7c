//! IntentClassifier: lexical fast path, exemplar-similarity fallback.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use concierge_core::config::ClassifierConfig;
use concierge_core::constants::PATTERN_CONFIDENCE;
use concierge_core::errors::{ConciergeError, ConciergeResult, EmbeddingError};
use concierge_core::models::{ClassificationMethod, IntentDecision};
use concierge_core::traits::{CancellationToken, IEmbeddingProvider};
use concierge_core::{Intent, RoutingTable};

use crate::exemplars::{self, ExemplarTable};
use crate::patterns;

/// Classifies queries into intents. Never fails: every error path degrades
/// to an `Unknown` decision.
pub struct IntentClassifier {
    embedder: Arc<dyn IEmbeddingProvider>,
    routing: RoutingTable,
    threshold: f64,
    embedding_timeout: Duration,
    /// Filled at most once. A failed fill leaves it empty so a later call
    /// can try again.
    exemplars: OnceCell<Arc<ExemplarTable>>,
}

impl IntentClassifier {
    pub fn new(
        embedder: Arc<dyn IEmbeddingProvider>,
        routing: RoutingTable,
        config: &ClassifierConfig,
    ) -> Self {
        info!(
            threshold = config.confidence_threshold,
            embedder = embedder.name(),
            hybrid = routing.hybrid_intents().count(),
            "IntentClassifier initialized"
        );
        Self {
            embedder,
            routing,
            threshold: config.confidence_threshold,
            embedding_timeout: Duration::from_millis(config.embedding_timeout_ms),
            exemplars: OnceCell::new(),
        }
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Pre-compute exemplar embeddings so the first unmatched query does not
    /// pay for them. Failure is logged and retried lazily.
    pub async fn warm_up(&self) -> bool {
        match self.exemplar_table().await {
            Ok(table) => {
                info!(exemplars = table.len(), "intent exemplars ready");
                true
            }
            Err(e) => {
                warn!(error = %e, "intent exemplar warm-up failed, will retry on demand");
                false
            }
        }
    }

    pub fn is_warm(&self) -> bool {
        self.exemplars.initialized()
    }

    /// Lexical stage only. `None` when no rule matches.
    pub fn classify_by_rules(&self, query: &str) -> Option<IntentDecision> {
        patterns::match_rules(query)
            .map(|intent| self.decision(intent, PATTERN_CONFIDENCE, ClassificationMethod::Pattern))
    }

    /// Full classification. Cancellation during the embedding stage yields
    /// `Unknown`; callers check the token afterwards.
    pub async fn classify(&self, query: &str, cancel: &CancellationToken) -> IntentDecision {
        let query = query.trim();
        if query.is_empty() {
            debug!("empty query, classifying as unknown");
            return IntentDecision::unknown(0.0, ClassificationMethod::None);
        }

        if let Some(decision) = self.classify_by_rules(query) {
            debug!(intent = %decision.intent, "lexical rule match");
            return decision;
        }

        let Some(result) = cancel.run(self.classify_by_embedding(query)).await else {
            debug!("classification cancelled during embedding stage");
            return IntentDecision::unknown(0.0, ClassificationMethod::None);
        };

        match result {
            Ok((intent, similarity)) if similarity >= self.threshold => {
                debug!(intent = %intent, similarity, "exemplar match");
                self.decision(intent, similarity, ClassificationMethod::Embedding)
            }
            Ok((intent, similarity)) => {
                debug!(
                    candidate = %intent,
                    similarity,
                    threshold = self.threshold,
                    "similarity below threshold, classifying as unknown"
                );
                IntentDecision::unknown(similarity, ClassificationMethod::Embedding)
            }
            Err(e) => {
                warn!(error = %e, "embedding stage unavailable, classifying as unknown");
                IntentDecision::unknown(0.0, ClassificationMethod::None)
            }
        }
    }

    fn decision(
        &self,
        intent: Intent,
        confidence: f64,
        method: ClassificationMethod,
    ) -> IntentDecision {
        IntentDecision::new(intent, confidence, method, self.routing.flags(intent))
    }

    async fn classify_by_embedding(&self, query: &str) -> ConciergeResult<(Intent, f64)> {
        let table = self.exemplar_table().await?;
        let embedder = self.embedder.clone();
        let text = query.to_string();
        let embedding = self.bounded(move || embedder.embed(&text)).await?;
        table.best_match(&embedding).ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "exemplar table is empty".to_string(),
            }
            .into()
        })
    }

    async fn exemplar_table(&self) -> ConciergeResult<Arc<ExemplarTable>> {
        self.exemplars
            .get_or_try_init(|| async {
                let phrases = exemplars::phrases();
                let texts: Vec<String> = phrases.iter().map(|(_, t)| t.clone()).collect();
                let embedder = self.embedder.clone();
                let vectors = self.bounded(move || embedder.embed_batch(&texts)).await?;
                let entries = phrases
                    .into_iter()
                    .map(|(intent, _)| intent)
                    .zip(vectors)
                    .collect();
                Ok::<_, ConciergeError>(Arc::new(ExemplarTable::new(entries)))
            })
            .await
            .cloned()
    }

    /// Run a blocking embedding call off the async workers, bounded by the
    /// configured timeout.
    async fn bounded<T, F>(&self, f: F) -> ConciergeResult<T>
    where
        F: FnOnce() -> ConciergeResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let timeout_ms = self.embedding_timeout.as_millis() as u64;
        match tokio::time::timeout(self.embedding_timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(EmbeddingError::InferenceFailed {
                reason: format!("embedding task failed: {join}"),
            }
            .into()),
            Err(_) => Err(EmbeddingError::Timeout { timeout_ms }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_embeddings::TfIdfFallback;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(
            Arc::new(TfIdfFallback::new(384)),
            RoutingTable::new(),
            &ClassifierConfig::default(),
        )
    }

    #[tokio::test]
    async fn whitespace_query_is_unknown_without_method() {
        let d = classifier().classify("   ", &CancellationToken::new()).await;
        assert_eq!(d.intent, Intent::Unknown);
        assert_eq!(d.method, ClassificationMethod::None);
        assert_eq!(d.confidence, 0.0);
    }

    #[tokio::test]
    async fn warm_up_fills_table_once() {
        let c = classifier();
        assert!(!c.is_warm());
        assert!(c.warm_up().await);
        assert!(c.is_warm());
    }

    #[tokio::test]
    async fn cancelled_token_skips_embedding_stage() {
        let token = CancellationToken::new();
        concierge_core::traits::Cancellable::cancel(&token);
        let d = classifier().classify("Show pending partner applications", &token).await;
        assert_eq!(d.intent, Intent::Unknown);
        assert_eq!(d.method, ClassificationMethod::None);
    }
}

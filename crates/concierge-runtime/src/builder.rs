//! Explicit wiring. Every collaborator can be injected; anything left out is
//! built from config.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use concierge_access::RoleValidator;
use concierge_core::errors::ConciergeResult;
use concierge_core::traits::{
    IDocumentIndex, IEmbeddingProvider, IGenerationBackend, IStructuredStore, ITelemetrySink,
};
use concierge_core::{ConciergeConfig, RoutingTable};
use concierge_data::DataEngine;
use concierge_embeddings::EmbeddingEngine;
use concierge_generation::GenerationFacade;
use concierge_intent::IntentClassifier;
use concierge_observability::{FanoutSink, MetricsCollector, QueryLog, TracingTelemetrySink};
use concierge_retrieval::RetrievalEngine;
use concierge_router::QueryRouter;
use concierge_storage::StorageEngine;

use crate::runtime::ConciergeRuntime;

pub struct RuntimeBuilder {
    config: ConciergeConfig,
    store: Option<Arc<dyn IStructuredStore>>,
    index: Option<Arc<dyn IDocumentIndex>>,
    embedder: Option<Arc<dyn IEmbeddingProvider>>,
    backends: Option<(Arc<dyn IGenerationBackend>, Arc<dyn IGenerationBackend>)>,
    telemetry: Option<Arc<dyn ITelemetrySink>>,
}

impl RuntimeBuilder {
    pub(crate) fn new(config: ConciergeConfig) -> Self {
        Self {
            config,
            store: None,
            index: None,
            embedder: None,
            backends: None,
            telemetry: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn IStructuredStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn document_index(mut self, index: Arc<dyn IDocumentIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn generation_backends(
        mut self,
        primary: Arc<dyn IGenerationBackend>,
        secondary: Arc<dyn IGenerationBackend>,
    ) -> Self {
        self.backends = Some((primary, secondary));
        self
    }

    /// Extra sink. Events also always reach the tracing sink and the
    /// runtime's own metrics.
    pub fn telemetry(mut self, sink: Arc<dyn ITelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    pub fn build(self) -> ConciergeResult<ConciergeRuntime> {
        let config = self.config;
        config.validate()?;

        let (embedder, embedding_engine) = match self.embedder {
            Some(embedder) => (embedder, None),
            None => {
                let engine = Arc::new(EmbeddingEngine::new(&config.embedding));
                (engine.clone() as Arc<dyn IEmbeddingProvider>, Some(engine))
            }
        };

        // One SQLite handle backs whichever of store and index were not injected.
        let (store, index): (Arc<dyn IStructuredStore>, Arc<dyn IDocumentIndex>) =
            match (self.store, self.index) {
                (Some(store), Some(index)) => (store, index),
                (store, index) => {
                    let storage = StorageEngine::from_config(&config.storage)?;
                    let index = match index {
                        Some(index) => index,
                        None => Arc::new(storage.document_index(embedder.clone())),
                    };
                    let store = match store {
                        Some(store) => store,
                        None => Arc::new(storage),
                    };
                    (store, index)
                }
            };

        let generation = Arc::new(match self.backends {
            Some((primary, secondary)) => GenerationFacade::new(
                primary,
                secondary,
                Duration::from_secs(config.generation.timeout_secs),
            ),
            None => GenerationFacade::from_config(&config.generation)?,
        });

        let metrics = Arc::new(MetricsCollector::new(config.observability.latency_window));
        let mut fanout = FanoutSink::new()
            .with(Arc::new(TracingTelemetrySink))
            .with(metrics.clone());
        if let Some(sink) = self.telemetry {
            fanout = fanout.with(sink);
        }
        let telemetry: Arc<dyn ITelemetrySink> = Arc::new(fanout);

        let routing = RoutingTable::with_hybrid(&config.router.hybrid_intents);
        let classifier = IntentClassifier::new(embedder.clone(), routing, &config.classifier);
        let router = QueryRouter::new(
            DataEngine::new(store, &config.data),
            RetrievalEngine::new(index, generation.clone(), &config.retrieval),
            generation.clone(),
            &config.router,
            telemetry.clone(),
        );

        info!(
            hybrid_intents = config.router.hybrid_intents.len(),
            "ConciergeRuntime initialized"
        );

        Ok(ConciergeRuntime {
            query_log: QueryLog::with_capacity(config.observability.query_log_capacity),
            config,
            classifier,
            validator: RoleValidator::new(),
            router,
            generation,
            embedder,
            embedding_engine,
            metrics,
            telemetry,
            started: Instant::now(),
        })
    }
}

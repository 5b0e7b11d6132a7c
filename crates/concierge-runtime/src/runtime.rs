//! ConciergeRuntime: owns every engine and runs the query pipeline.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, Instrument};

use concierge_access::RoleValidator;
use concierge_core::errors::{error_code, BoundaryError, ConciergeResult};
use concierge_core::models::{DocumentCategory, QueryRequest, RequestScope, TelemetryEvent};
use concierge_core::traits::{Cancellable, CancellationToken, IEmbeddingProvider, ITelemetrySink};
use concierge_core::{ConciergeConfig, DataSource, QueryResponse};
use concierge_embeddings::EmbeddingEngine;
use concierge_generation::{GenerationFacade, GenerationStats};
use concierge_intent::IntentClassifier;
use concierge_observability::tracing_setup::events;
use concierge_observability::{
    authorize_span, classify_span, route_span, MetricsCollector, MetricsSummary, QueryLog,
    QueryLogEntry,
};
use concierge_router::{responses, QueryRouter};

use crate::builder::RuntimeBuilder;
use crate::health::{ComponentHealth, HealthReport};

/// Read-only operational snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStats {
    pub uptime_seconds: f64,
    pub generation: GenerationStats,
    pub metrics: MetricsSummary,
}

/// The central runtime. Construct once with [`ConciergeRuntime::builder`] and
/// share by reference; `query` takes `&self` and is safe to call concurrently.
pub struct ConciergeRuntime {
    pub(crate) config: ConciergeConfig,
    pub(crate) classifier: IntentClassifier,
    pub(crate) validator: RoleValidator,
    pub(crate) router: QueryRouter,
    pub(crate) generation: Arc<GenerationFacade>,
    pub(crate) embedder: Arc<dyn IEmbeddingProvider>,
    /// Present when the runtime built its own embedding engine.
    pub(crate) embedding_engine: Option<Arc<EmbeddingEngine>>,
    pub(crate) metrics: Arc<MetricsCollector>,
    pub(crate) telemetry: Arc<dyn ITelemetrySink>,
    pub(crate) query_log: QueryLog,
    pub(crate) started: Instant,
}

impl ConciergeRuntime {
    pub fn builder(config: ConciergeConfig) -> RuntimeBuilder {
        RuntimeBuilder::new(config)
    }

    /// Runtime with every collaborator built from `config`.
    pub fn from_config(config: ConciergeConfig) -> ConciergeResult<Self> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &ConciergeConfig {
        &self.config
    }

    /// Answer one query.
    ///
    /// Only malformed input is an error. Every failure past the boundary
    /// becomes a response carrying a safe message.
    pub async fn query(
        &self,
        request: QueryRequest,
        cancel: CancellationToken,
    ) -> Result<QueryResponse, BoundaryError> {
        let validated = request.validate()?;
        let started = Instant::now();
        let scope = RequestScope::from_validated(&validated, cancel);

        self.emit(TelemetryEvent::QueryStarted {
            request_id: scope.request_id,
            role: scope.role,
            at: Utc::now(),
        });

        let decision = self
            .classifier
            .classify(&validated.query, &scope.cancel)
            .instrument(classify_span!(scope.request_id))
            .await;
        self.drain_degradation();

        if scope.cancel.is_cancelled() {
            debug!(request_id = %scope.request_id, "cancelled during classification");
            self.emit(TelemetryEvent::PipelineError {
                request_id: scope.request_id,
                code: error_code::CANCELLED.to_string(),
                stage: "classify".to_string(),
            });
            let response = responses::cancelled(&decision, scope.role);
            return Ok(self.complete(&validated.query, &scope, response, started));
        }

        self.emit(TelemetryEvent::IntentClassified {
            request_id: scope.request_id,
            intent: decision.intent,
            confidence: decision.confidence,
            method: decision.method,
        });

        let authorization = authorize_span!(scope.role, decision.intent).in_scope(|| {
            self.validator.authorize(
                &scope.user_id,
                scope.role,
                decision.intent,
                scope.resource_owner_id.as_deref(),
            )
        });
        self.emit(TelemetryEvent::RoleValidated {
            request_id: scope.request_id,
            role: authorization.role,
            intent: authorization.intent,
            allowed: authorization.allowed,
            denial: authorization.denial,
        });

        let data_source = DataSource::from_flags(decision.flags());
        let response = self
            .router
            .route(&validated.query, &decision, &authorization, &scope)
            .instrument(route_span!(decision.intent, data_source))
            .await;

        Ok(self.complete(&validated.query, &scope, response, started))
    }

    /// Stamp end-to-end latency, emit completion, record to the query log.
    fn complete(
        &self,
        query: &str,
        scope: &RequestScope,
        mut response: QueryResponse,
        started: Instant,
    ) -> QueryResponse {
        let elapsed = started.elapsed();
        let latency_ms = (elapsed.as_secs_f64() * 100_000.0).round() / 100.0;
        response.metadata.latency_ms = latency_ms;

        self.emit(TelemetryEvent::QueryCompleted {
            request_id: scope.request_id,
            intent: response.intent,
            data_source: response.data_source,
            latency_ms,
        });
        self.query_log.record(QueryLogEntry::new(
            query,
            response.intent,
            response.data_source,
            elapsed,
            response.metadata.record_count.unwrap_or(0),
        ));
        response
    }

    /// Forward embedding fallbacks recorded since the last query to the log.
    fn drain_degradation(&self) {
        let Some(engine) = &self.embedding_engine else {
            return;
        };
        for event in engine.drain_degradation_events() {
            events::degradation_triggered(&event.component, &event.failure, &event.fallback_used);
        }
    }

    /// Chunk and index a document into the knowledge base.
    pub async fn index_document(
        &self,
        category: DocumentCategory,
        document_id: &str,
        title: &str,
        text: &str,
        section: &str,
    ) -> ConciergeResult<usize> {
        self.router
            .retrieval_engine()
            .index_document(category, document_id, title, text, section)
            .await
    }

    /// Chunks currently indexed for `category`.
    pub fn document_count(&self, category: DocumentCategory) -> ConciergeResult<usize> {
        self.router.retrieval_engine().document_count(category)
    }

    /// Precompute the intent exemplar table so the first query doesn't pay
    /// for it. Returns whether the table is ready.
    pub async fn warm_up(&self) -> bool {
        let ready = self.classifier.warm_up().await;
        self.drain_degradation();
        ready
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            uptime_seconds: self.started.elapsed().as_secs_f64(),
            generation: self.generation.stats(),
            metrics: self.metrics.summary(),
        }
    }

    /// Zero the generation counters and the pipeline metrics.
    pub fn reset_stats(&self) {
        self.generation.reset_stats();
        self.metrics.reset();
        info!("runtime stats reset");
    }

    /// Check each dependency. Storage is the only one the service cannot
    /// answer without.
    pub async fn health(&self) -> HealthReport {
        let storage = self.router.data_engine().ping().await;
        let mut components = vec![ComponentHealth::new(
            "storage",
            storage,
            true,
            if storage { "reachable" } else { "unreachable" },
        )];

        for (slot, available) in self.generation.backend_availability() {
            components.push(ComponentHealth::new(
                &format!("generation.{}", slot.as_str()),
                available,
                false,
                if available { "configured" } else { "unavailable" },
            ));
        }

        let embedding = self.embedder.is_available();
        components.push(ComponentHealth::new(
            "embedding",
            embedding,
            false,
            self.embedder.name(),
        ));

        HealthReport::from_components(components)
    }

    pub fn query_log(&self) -> &QueryLog {
        &self.query_log
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    fn emit(&self, event: TelemetryEvent) {
        self.telemetry.emit(&event);
    }
}

//! QueryRouter: one response per authorized decision, data path chosen from
//! the decision's routing flags alone.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use concierge_core::config::RouterConfig;
use concierge_core::errors::{error_code, ConciergeErrorCode};
use concierge_core::models::{
    AuthorizationResult, DataFailure, DataResult, GenerationRequest, IntentDecision, RefusalReason,
    RequestScope, ResponseMetadata, RetrievalOutcome, TelemetryEvent,
};
use concierge_core::traits::ITelemetrySink;
use concierge_core::{DataSource, Intent, QueryResponse};
use concierge_data::{DataEngine, DataRequest};
use concierge_generation::GenerationFacade;
use concierge_observability::{data_span, generation_span, retrieval_span};
use concierge_retrieval::RetrievalEngine;

use crate::{format, responses};

/// A path that ran to completion.
struct Answer {
    text: String,
    raw: Option<serde_json::Value>,
}

/// A path that hit a failure the caller must not see the details of.
struct PathFailure {
    code: &'static str,
    stage: &'static str,
    detail: String,
}

impl PathFailure {
    fn storage(stage: &'static str, detail: impl Into<String>) -> Self {
        Self {
            code: error_code::STORAGE_FAILURE,
            stage,
            detail: detail.into(),
        }
    }

    fn generation(stage: &'static str) -> Self {
        Self {
            code: error_code::GENERATION_UNAVAILABLE,
            stage,
            detail: "both generation backends failed".to_string(),
        }
    }
}

pub struct QueryRouter {
    data: DataEngine,
    retrieval: RetrievalEngine,
    generation: Arc<GenerationFacade>,
    config: RouterConfig,
    telemetry: Arc<dyn ITelemetrySink>,
}

impl QueryRouter {
    pub fn new(
        data: DataEngine,
        retrieval: RetrievalEngine,
        generation: Arc<GenerationFacade>,
        config: &RouterConfig,
        telemetry: Arc<dyn ITelemetrySink>,
    ) -> Self {
        info!(
            formatting = config.formatting_enabled,
            "QueryRouter initialized"
        );
        Self {
            data,
            retrieval,
            generation,
            config: config.clone(),
            telemetry,
        }
    }

    pub fn data_engine(&self) -> &DataEngine {
        &self.data
    }

    pub fn retrieval_engine(&self) -> &RetrievalEngine {
        &self.retrieval
    }

    /// Produce the response for one classified, authorized query.
    ///
    /// Always returns a response with non-empty text. `raw_data` is present
    /// only when the scope asks for it.
    pub async fn route(
        &self,
        query: &str,
        decision: &IntentDecision,
        authorization: &AuthorizationResult,
        scope: &RequestScope,
    ) -> QueryResponse {
        let started = Instant::now();

        if !authorization.allowed {
            debug!(
                request_id = %scope.request_id,
                intent = %authorization.intent,
                "denied before routing"
            );
            return finish(responses::denied(decision, authorization), started);
        }

        let role = authorization.role;
        let intent = decision.intent;
        let data_source = DataSource::from_flags(decision.flags());
        self.emit(TelemetryEvent::QueryRouted {
            request_id: scope.request_id,
            intent,
            data_source,
        });

        if data_source == DataSource::None {
            warn!(request_id = %scope.request_id, "no data path for query, asking to rephrase");
            return finish(responses::clarification(decision, role), started);
        }
        debug!(
            request_id = %scope.request_id,
            intent = %intent,
            data_source = data_source.as_str(),
            "routing query"
        );

        let mut meta = responses::metadata(decision);
        let path = async {
            let meta = &mut meta;
            match data_source {
                DataSource::Structured => self.answer_structured(query, intent, scope, meta).await,
                DataSource::Retrieval => self.answer_retrieval(query, intent, scope, meta).await,
                _ => self.answer_hybrid(query, intent, scope, meta).await,
            }
        };
        let outcome = scope.cancel.run(path).await;

        let response = match outcome {
            Some(Ok(answer)) => QueryResponse {
                intent,
                role,
                data_source,
                response_text: answer.text,
                metadata: meta,
                raw_data: answer.raw.filter(|_| scope.include_raw_data),
            },
            Some(Err(failure)) => {
                let correlation_id = Uuid::new_v4();
                error!(
                    request_id = %scope.request_id,
                    correlation_id = %correlation_id,
                    code = failure.code,
                    stage = failure.stage,
                    detail = %failure.detail,
                    "query path failed"
                );
                self.emit(TelemetryEvent::PipelineError {
                    request_id: scope.request_id,
                    code: failure.code.to_string(),
                    stage: failure.stage.to_string(),
                });
                responses::failure(
                    decision,
                    role,
                    data_source,
                    &failure.code.to_ascii_lowercase(),
                    correlation_id,
                )
            }
            None => {
                warn!(request_id = %scope.request_id, "cancelled while routing");
                self.emit(TelemetryEvent::PipelineError {
                    request_id: scope.request_id,
                    code: error_code::CANCELLED.to_string(),
                    stage: "route".to_string(),
                });
                responses::cancelled(decision, role)
            }
        };
        finish(response, started)
    }

    async fn answer_structured(
        &self,
        query: &str,
        intent: Intent,
        scope: &RequestScope,
        meta: &mut ResponseMetadata,
    ) -> Result<Answer, PathFailure> {
        let result = self.fetch(intent, scope).await?;
        meta.record_count = Some(result.count);

        let text = if result.success && self.config.formatting_enabled {
            let request = GenerationRequest::new(
                format::format_prompt(intent, query, &result),
                self.config.format_max_tokens,
                self.config.format_temperature,
            )
            .with_system(format::FORMAT_SYSTEM_PROMPT);
            match self.generate("format", &request, scope, meta).await {
                Some(text) => text,
                None => format::template(intent, &result),
            }
        } else {
            format::template(intent, &result)
        };

        Ok(Answer {
            text,
            raw: serde_json::to_value(&result).ok(),
        })
    }

    async fn answer_retrieval(
        &self,
        query: &str,
        intent: Intent,
        scope: &RequestScope,
        meta: &mut ResponseMetadata,
    ) -> Result<Answer, PathFailure> {
        let outcome = self.search(query, intent, scope).await?;

        match outcome.refusal {
            Some(RefusalReason::GenerationUnavailable) => {
                self.emit(TelemetryEvent::GenerationUnavailable {
                    request_id: scope.request_id,
                });
                return Err(PathFailure::generation("retrieval"));
            }
            Some(reason) => {
                debug!(request_id = %scope.request_id, reason = reason.as_str(), "retrieval refused");
                meta.reason = Some(reason.as_str().to_string());
            }
            None => meta.citations = Some(outcome.citations.clone()),
        }
        meta.chunk_count = Some(outcome.chunk_count);

        Ok(Answer {
            raw: serde_json::to_value(&outcome).ok(),
            text: outcome.response_text,
        })
    }

    /// Both paths concurrently. Structured data is required; the knowledge
    /// base only enriches.
    async fn answer_hybrid(
        &self,
        query: &str,
        intent: Intent,
        scope: &RequestScope,
        meta: &mut ResponseMetadata,
    ) -> Result<Answer, PathFailure> {
        let (data, knowledge) =
            tokio::join!(self.fetch(intent, scope), self.search(query, intent, scope));
        let result = data?;
        let knowledge = match knowledge {
            Ok(outcome) => Some(outcome),
            Err(failure) => {
                warn!(
                    request_id = %scope.request_id,
                    detail = %failure.detail,
                    "knowledge context unavailable, continuing with structured data"
                );
                None
            }
        };

        meta.record_count = Some(result.count);
        meta.chunk_count = Some(knowledge.as_ref().map_or(0, |k| k.chunk_count));
        if let Some(k) = knowledge.as_ref().filter(|k| k.success) {
            meta.citations = Some(k.citations.clone());
        }

        let text = if result.success && self.config.formatting_enabled {
            let request = GenerationRequest::new(
                format::hybrid_prompt(intent, query, &result, knowledge.as_ref()),
                self.config.hybrid_max_tokens,
                self.config.format_temperature,
            )
            .with_system(format::HYBRID_SYSTEM_PROMPT);
            match self.generate("hybrid_synthesis", &request, scope, meta).await {
                Some(text) => text,
                None => format::template(intent, &result),
            }
        } else {
            format::template(intent, &result)
        };

        Ok(Answer {
            text,
            raw: Some(json!({ "database": result, "retrieval": knowledge })),
        })
    }

    /// Structured lookup. Store failures become a `PathFailure`; every other
    /// envelope is a user-facing result.
    async fn fetch(&self, intent: Intent, scope: &RequestScope) -> Result<DataResult, PathFailure> {
        let started = Instant::now();
        let result = self
            .data
            .execute(&DataRequest::from_scope(intent, scope))
            .instrument(data_span!(intent))
            .await;
        self.emit(TelemetryEvent::DatabaseQueried {
            request_id: scope.request_id,
            intent,
            success: result.success,
            record_count: result.count,
            latency_ms: elapsed_ms(started),
        });
        if result.failure == Some(DataFailure::Storage) {
            return Err(PathFailure::storage("data", result.message));
        }
        Ok(result)
    }

    async fn search(
        &self,
        query: &str,
        intent: Intent,
        scope: &RequestScope,
    ) -> Result<RetrievalOutcome, PathFailure> {
        let started = Instant::now();
        let result = self
            .retrieval
            .query(query, intent, scope.role)
            .instrument(retrieval_span!(intent))
            .await;
        let (success, chunk_count) = match &result {
            Ok(o) => (o.success, o.chunk_count),
            Err(_) => (false, 0),
        };
        self.emit(TelemetryEvent::RetrievalQueried {
            request_id: scope.request_id,
            intent,
            success,
            chunk_count,
            latency_ms: elapsed_ms(started),
        });
        result.map_err(|e| PathFailure {
            code: e.error_code(),
            stage: "retrieval",
            detail: e.to_string(),
        })
    }

    /// One facade call for formatting. `None` means use the template.
    async fn generate(
        &self,
        purpose: &'static str,
        request: &GenerationRequest,
        scope: &RequestScope,
        meta: &mut ResponseMetadata,
    ) -> Option<String> {
        let outcome = self
            .generation
            .generate(request)
            .instrument(generation_span!(purpose))
            .await;
        match outcome {
            Some(outcome) => {
                self.emit(TelemetryEvent::GenerationCompleted {
                    request_id: scope.request_id,
                    backend: outcome.backend_used,
                    fallback_used: outcome.fallback_used,
                    latency_ms: outcome.latency_ms,
                });
                meta.formatted_by = Some(outcome.backend_used);
                meta.fallback_used = Some(outcome.fallback_used);
                Some(outcome.text)
            }
            None => {
                warn!(request_id = %scope.request_id, "formatting unavailable, using template");
                self.emit(TelemetryEvent::GenerationUnavailable {
                    request_id: scope.request_id,
                });
                None
            }
        }
    }

    fn emit(&self, event: TelemetryEvent) {
        self.telemetry.emit(&event);
    }
}

fn finish(mut response: QueryResponse, started: Instant) -> QueryResponse {
    if response.response_text.trim().is_empty() {
        warn!(intent = %response.intent, "empty response text replaced with apology");
        response.response_text = responses::GENERIC_APOLOGY.to_string();
    }
    response.metadata.latency_ms = round2(elapsed_ms(started));
    response
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
